// src/entity/item.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AiAnalysis, BreakdownStatus, ItemStatus, Priority};

/// A unit of work in the hierarchy. Root items (`parent_id == None`,
/// `depth == 0`) are "problems"; children are nested breakdowns.
///
/// Field names are camelCase on the wire so existing `problems.json`
/// documents keep loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    // Hierarchy. depth is parent.depth + 1, fixed at creation time.
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    #[serde(default)]
    pub depth: u32,
    #[serde(default)]
    pub order: u32,

    #[serde(default)]
    pub status: ItemStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub breakdown_status: BreakdownStatus,
    #[serde(default = "default_true")]
    pub can_breakdown: bool,

    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,

    #[serde(default)]
    pub blocked_by: Vec<Uuid>,
    #[serde(default)]
    pub blocking: Vec<Uuid>,

    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub meta_skill_ids: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<AiAnalysis>,
}

fn default_true() -> bool {
    true
}

impl Item {
    pub fn new(title: String, parent_id: Option<Uuid>, depth: u32) -> Self {
        let now = Utc::now();
        let status = if depth == 0 {
            ItemStatus::Backlog
        } else {
            ItemStatus::Todo
        };
        Self {
            id: Uuid::new_v4(),
            title,
            description: None,
            parent_id,
            depth,
            order: 0,
            status,
            priority: Priority::default(),
            breakdown_status: BreakdownStatus::default(),
            can_breakdown: true,
            created_at: now,
            updated_at: Some(now),
            estimated_hours: None,
            actual_hours: None,
            due_date: None,
            blocked_by: Vec::new(),
            blocking: Vec::new(),
            tags: Vec::new(),
            meta_skill_ids: Vec::new(),
            ai_analysis: None,
        }
    }

    /// Last-modified timestamp, falling back to `created_at` for documents
    /// written before `updatedAt` existed.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Partial-update payload for an item. `None` means "leave unchanged";
/// `updated_at` is always refreshed when the update is applied.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<ItemStatus>,
    pub priority: Option<Priority>,
    pub breakdown_status: Option<BreakdownStatus>,
    pub can_breakdown: Option<bool>,
    pub order: Option<u32>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    pub due_date: Option<String>,
    pub blocked_by: Option<Vec<Uuid>>,
    pub blocking: Option<Vec<Uuid>>,
    pub tags: Option<Vec<String>>,
    pub meta_skill_ids: Option<Vec<String>>,
    pub ai_analysis: Option<AiAnalysis>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_defaults_to_backlog() {
        let item = Item::new("Fix bug".to_string(), None, 0);
        assert_eq!(item.status, ItemStatus::Backlog);
        assert_eq!(item.depth, 0);
        assert!(item.is_root());
    }

    #[test]
    fn test_child_defaults_to_todo() {
        let parent = Item::new("Fix bug".to_string(), None, 0);
        let child = Item::new("Write test".to_string(), Some(parent.id), 1);
        assert_eq!(child.status, ItemStatus::Todo);
        assert_eq!(child.depth, parent.depth + 1);
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let item = Item::new("Fix bug".to_string(), None, 0);
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("parentId").is_some());
        assert!(json.get("breakdownStatus").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("parent_id").is_none());
    }

    #[test]
    fn test_missing_fields_backfilled_on_read() {
        // A minimal v2 record as an old document might contain it.
        let json = r#"{
            "id": "8c4b2b6a-1f7e-4d3c-9a2e-5f6d7c8b9a0e",
            "title": "old item",
            "createdAt": "2024-01-01T00:00:00Z"
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.status, ItemStatus::Backlog);
        assert_eq!(item.priority, Priority::Medium);
        assert!(item.can_breakdown);
        assert!(item.tags.is_empty());
        assert_eq!(item.updated_at(), item.created_at);
    }
}
