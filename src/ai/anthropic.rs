// src/ai/anthropic.rs
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::AiProvider;
use crate::config::AiConfig;
use crate::error::{LifelogError, Result};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";
const TIMEOUT_SECS: u64 = 60;

/// Anthropic messages API client. Replies arrive as text content blocks;
/// the messages API has no forced-JSON mode, so the prompt asks for JSON
/// and the shared parser strips any markdown fence.
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
}

impl AnthropicProvider {
    pub fn new(config: &AiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| LifelogError::Provider("no API key configured".to_string()))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            api_key,
            model: config.model_or_default().to_string(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl AiProvider for AnthropicProvider {
    async fn chat(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/messages", self.base_url.trim_end_matches('/'));
        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "messages": [{"role": "user", "content": prompt}],
        });

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(LifelogError::Provider(format!(
                "Anthropic API returned {}: {}",
                status, detail
            )));
        }

        let data: serde_json::Value = response.json().await?;
        let content = data["content"][0]["text"]
            .as_str()
            .ok_or_else(|| LifelogError::Provider("empty message in response".to_string()))?;
        Ok(content.to_string())
    }
}
