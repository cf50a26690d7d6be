// src/ai/openai.rs
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::AiProvider;
use crate::config::AiConfig;
use crate::error::{LifelogError, Result};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const TIMEOUT_SECS: u64 = 60;

/// OpenAI chat completions client. Also backs the `custom` provider, which
/// points the same wire format at a different base URL.
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
}

impl OpenAiProvider {
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
impl AiProvider for OpenAiProvider {
    async fn chat(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": 0.7,
            "max_tokens": self.max_tokens,
            "response_format": {"type": "json_object"},
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(LifelogError::Provider(format!(
                "OpenAI API returned {}: {}",
                status, detail
            )));
        }

        let data: serde_json::Value = response.json().await?;
        let content = data["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| LifelogError::Provider("empty completion in response".to_string()))?;
        Ok(content.to_string())
    }
}
