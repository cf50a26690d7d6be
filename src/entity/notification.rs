// src/entity/notification.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Priority;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Priority,
    Blocking,
    Context,
    Reminder,
}

/// An ephemeral nudge tied to an item or task via `related_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
    pub related_id: Uuid,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(kind: NotificationKind, title: String, message: String, related_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            title,
            message,
            action_url: None,
            related_id,
            priority: Priority::default(),
            read: false,
            created_at: Utc::now(),
        }
    }
}
