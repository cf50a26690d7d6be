// src/ai/ollama.rs
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::AiProvider;
use crate::config::AiConfig;
use crate::error::{LifelogError, Result};

const DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";
// Local models can be slow to load on first request.
const TIMEOUT_SECS: u64 = 120;

/// Local Ollama client via its OpenAI-compatible endpoint. No API key.
pub struct OllamaProvider {
    client: Client,
    model: String,
    base_url: String,
    max_tokens: u32,
}

impl OllamaProvider {
    pub fn new(config: &AiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
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
impl AiProvider for OllamaProvider {
    async fn chat(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": 0.7,
            "max_tokens": self.max_tokens,
        });

        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(LifelogError::Provider(format!(
                "Ollama returned {}: {}",
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
