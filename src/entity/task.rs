// src/entity/task.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ItemStatus, Priority};

/// A sub-unit of work attached to a root problem, optionally nested under
/// another task. Kept alongside the item hierarchy for documents that still
/// carry a task list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub problem_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_task_id: Option<Uuid>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_task_status")]
    pub status: ItemStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub order: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub can_breakdown: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_hours: Option<f64>,
    #[serde(default)]
    pub blocked_by: Vec<Uuid>,
    #[serde(default)]
    pub blocking: Vec<Uuid>,
}

fn default_task_status() -> ItemStatus {
    ItemStatus::Todo
}

fn default_true() -> bool {
    true
}

impl Task {
    pub fn new(title: String, problem_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            problem_id,
            parent_task_id: None,
            title,
            description: None,
            status: ItemStatus::Todo,
            priority: Priority::default(),
            order: 0,
            created_at: now,
            updated_at: Some(now),
            can_breakdown: true,
            estimated_hours: None,
            actual_hours: None,
            blocked_by: Vec::new(),
            blocking: Vec::new(),
        }
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }
}

/// Partial-update payload for a task.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<ItemStatus>,
    pub priority: Option<Priority>,
    pub order: Option<u32>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
}
