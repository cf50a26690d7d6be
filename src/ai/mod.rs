// src/ai/mod.rs
//
// Remote analysis backends. Every provider speaks chat-completion-style
// HTTP and returns a model-produced JSON body; the shared prompt/parse
// layer lives in `prompt` so backends only implement transport.
mod anthropic;
mod ollama;
mod openai;
mod prompt;

pub use anthropic::AnthropicProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

use async_trait::async_trait;

use crate::config::{AiConfig, ProviderKind};
use crate::entity::{AiAnalysis, Item, ReviewOptions, ReviewResult, Summary};
use crate::error::{LifelogError, Result};

/// A remote model that can analyze, review, and summarize journal items.
///
/// Backends implement `chat`; the higher-level operations are shared.
/// Failures are recoverable: callers downgrade them to warnings and keep
/// going. No retries are attempted.
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// One prompt in, the model's text reply out.
    async fn chat(&self, prompt: &str) -> Result<String>;

    /// Analyze a single item against recent context items.
    async fn analyze(&self, item: &Item, context: &[Item]) -> Result<AiAnalysis> {
        let content = self.chat(&prompt::analyze_prompt(item, context)).await?;
        prompt::parse_analysis(&content, context)
    }

    /// Cross-problem review: recurring patterns and what to do about them.
    async fn review(&self, items: &[Item], options: &ReviewOptions) -> Result<ReviewResult> {
        let content = self.chat(&prompt::review_prompt(items, options)).await?;
        prompt::parse_review(&content, items)
    }

    /// Periodic digest (`daily`, `weekly` or `monthly`).
    async fn summarize(&self, items: &[Item], period: &str) -> Result<Summary> {
        let content = self.chat(&prompt::summary_prompt(items, period)).await?;
        prompt::parse_summary(&content, period, items.len())
    }
}

/// Build the configured provider. The `custom` provider speaks the
/// OpenAI-compatible wire format against the configured base URL.
pub fn provider_from_config(config: &AiConfig) -> Result<Box<dyn AiProvider>> {
    if !config.enabled {
        return Err(LifelogError::AiDisabled);
    }
    Ok(match config.provider {
        ProviderKind::Openai | ProviderKind::Custom => Box::new(OpenAiProvider::new(config)?),
        ProviderKind::Anthropic => Box::new(AnthropicProvider::new(config)?),
        ProviderKind::Ollama => Box::new(OllamaProvider::new(config)?),
    })
}
