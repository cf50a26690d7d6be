use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LifelogError {
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Reflection not found: {0}")]
    ReflectionNotFound(String),

    #[error("A reflection already exists for {0}. Edit it instead.")]
    ReflectionExists(String),

    #[error("Storage file is corrupted at {path}: {reason}. Back it up and remove it to start fresh.")]
    CorruptStorage { path: PathBuf, reason: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("AI features are disabled. Run 'lifelog config set enabled true' and set an API key.")]
    AiDisabled,

    #[error("AI provider error: {0}")]
    Provider(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, LifelogError>;
