// src/entity/reflection.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A dated journal entry. At most one reflection exists per calendar day;
/// `date` is the local day formatted as `YYYY-MM-DD`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reflection {
    pub id: Uuid,
    pub date: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Reflection {
    pub fn new(date: String, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            content,
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_camel_case() {
        let r = Reflection::new("2026-08-30".to_string(), "shipped the parser".to_string());
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["date"], "2026-08-30");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_none());
    }
}
