// src/config.rs
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{LifelogError, Result};

pub const DATA_DIR_ENV: &str = "LIFELOG_DIR";
const CONFIG_FILE: &str = "config.json";

/// AI backend selection. `Custom` speaks the OpenAI wire format against
/// a user-supplied base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Openai,
    Anthropic,
    Ollama,
    Custom,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Openai => write!(f, "openai"),
            ProviderKind::Anthropic => write!(f, "anthropic"),
            ProviderKind::Ollama => write!(f, "ollama"),
            ProviderKind::Custom => write!(f, "custom"),
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = LifelogError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "openai" => Ok(ProviderKind::Openai),
            "anthropic" => Ok(ProviderKind::Anthropic),
            "ollama" => Ok(ProviderKind::Ollama),
            "custom" => Ok(ProviderKind::Custom),
            other => Err(LifelogError::Validation(format!(
                "unknown provider '{}' (expected openai, anthropic, ollama or custom)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiConfig {
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_max_tokens() -> u32 {
    1024
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            api_key: None,
            model: None,
            base_url: None,
            enabled: false,
            max_tokens: default_max_tokens(),
        }
    }
}

impl AiConfig {
    /// Default model per provider when none is configured.
    pub fn model_or_default(&self) -> &str {
        match (&self.model, self.provider) {
            (Some(m), _) => m.as_str(),
            (None, ProviderKind::Openai) => "gpt-4o-mini",
            (None, ProviderKind::Anthropic) => "claude-3-5-haiku-20241022",
            (None, ProviderKind::Ollama) => "llama3.2",
            (None, ProviderKind::Custom) => "gpt-4o-mini",
        }
    }
}

/// Resolved application configuration: where data lives plus AI settings.
///
/// The data directory is injected rather than discovered at use sites, so
/// tests and the server can point the whole stack at a scratch directory.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub ai: AiConfig,
}

impl Config {
    /// Resolve the data directory: explicit flag, then `LIFELOG_DIR`,
    /// then `~/.lifelog`.
    pub fn resolve_data_dir(flag: Option<PathBuf>) -> PathBuf {
        if let Some(dir) = flag {
            return dir;
        }
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.is_empty() {
                return PathBuf::from(dir);
            }
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".lifelog")
    }

    /// Load config from `<data_dir>/config.json`, falling back to defaults
    /// when the file does not exist. A malformed config file is an error;
    /// silently resetting it would discard the user's API key.
    pub fn load(data_dir: PathBuf) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE);
        let ai = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| LifelogError::CorruptStorage {
                path: path.clone(),
                reason: e.to_string(),
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => AiConfig::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { data_dir, ai })
    }

    /// Persist the AI settings back to `<data_dir>/config.json`.
    pub fn save(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        let path = self.config_path();
        let json = serde_json::to_string_pretty(&self.ai)?;
        std::fs::write(&path, json)?;
        Ok(())
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE)
    }

    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join("problems.json")
    }
}

/// Mask an API key for display: keep the first 4 and last 4 characters.
/// Counts characters, not bytes, so keys with multi-byte content never
/// split a char boundary.
pub fn mask_key(key: &str) -> String {
    let len = key.chars().count();
    if len <= 8 {
        return "*".repeat(len);
    }
    let head: String = key.chars().take(4).collect();
    let tail: String = key.chars().skip(len - 4).collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path().to_path_buf()).unwrap();
        assert!(!config.ai.enabled);
        assert_eq!(config.ai.provider, ProviderKind::Openai);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::load(dir.path().to_path_buf()).unwrap();
        config.ai.provider = ProviderKind::Ollama;
        config.ai.model = Some("llama3.2".to_string());
        config.ai.enabled = true;
        config.save().unwrap();

        let reloaded = Config::load(dir.path().to_path_buf()).unwrap();
        assert_eq!(reloaded.ai.provider, ProviderKind::Ollama);
        assert!(reloaded.ai.enabled);
    }

    #[test]
    fn corrupt_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.json"), "{not json").unwrap();
        let err = Config::load(dir.path().to_path_buf()).unwrap_err();
        assert!(matches!(err, LifelogError::CorruptStorage { .. }));
    }

    #[test]
    fn masks_keys() {
        assert_eq!(mask_key("sk-abcdefghijkl"), "sk-a...ijkl");
    }

    #[test]
    fn masks_multibyte_keys_without_panicking() {
        assert_eq!(mask_key("aééééééééé"), "aééé...éééé");
        assert_eq!(mask_key("ééééé"), "*****");
    }

    #[test]
    fn short_keys_fully_masked() {
        assert_eq!(mask_key("abc"), "***");
    }
}
