// src/storage/mod.rs
mod json_store;

pub use json_store::{JsonStore, NewItem};

use serde::{Deserialize, Serialize};

use crate::entity::{Item, Notification, Reflection, Task};

pub const DOCUMENT_VERSION: u32 = 2;

/// The whole on-disk state: one JSON document holding every collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub reflections: Vec<Reflection>,
    #[serde(default)]
    pub meta_skills: Vec<serde_json::Value>,
    #[serde(default = "current_version")]
    pub version: u32,
}

fn current_version() -> u32 {
    DOCUMENT_VERSION
}

impl Default for Document {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            tasks: Vec::new(),
            notifications: Vec::new(),
            reflections: Vec::new(),
            meta_skills: Vec::new(),
            version: DOCUMENT_VERSION,
        }
    }
}
