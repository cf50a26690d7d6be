mod analysis;
mod item;
mod notification;
mod reflection;
mod task;

pub use analysis::{
    AiAnalysis, Pattern, Resource, ReviewOptions, ReviewResult, Summary, SummaryOverview,
};
pub use item::{Item, ItemUpdate};
pub use notification::{Notification, NotificationKind};
pub use reflection::Reflection;
pub use task::{Task, TaskUpdate};

use serde::{Deserialize, Serialize};

/// Lifecycle status shared by items and tasks.
///
/// `Backlog` only applies to root items; tasks and nested items start at
/// `Todo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    Backlog,
    Todo,
    InProgress,
    Blocked,
    Done,
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemStatus::Backlog => write!(f, "backlog"),
            ItemStatus::Todo => write!(f, "todo"),
            ItemStatus::InProgress => write!(f, "in_progress"),
            ItemStatus::Blocked => write!(f, "blocked"),
            ItemStatus::Done => write!(f, "done"),
        }
    }
}

impl std::str::FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "backlog" => Ok(ItemStatus::Backlog),
            "todo" => Ok(ItemStatus::Todo),
            "in_progress" | "inprogress" => Ok(ItemStatus::InProgress),
            "blocked" => Ok(ItemStatus::Blocked),
            "done" => Ok(ItemStatus::Done),
            _ => Err(format!("Invalid status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
            Priority::Urgent => write!(f, "urgent"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            _ => Err(format!("Invalid priority: {}", s)),
        }
    }
}

/// Where an item stands in the AI-assisted breakdown flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BreakdownStatus {
    #[default]
    Pending,
    Suggested,
    Approved,
    Rejected,
}

impl std::fmt::Display for BreakdownStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BreakdownStatus::Pending => write!(f, "pending"),
            BreakdownStatus::Suggested => write!(f, "suggested"),
            BreakdownStatus::Approved => write!(f, "approved"),
            BreakdownStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for BreakdownStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(BreakdownStatus::Pending),
            "suggested" => Ok(BreakdownStatus::Suggested),
            "approved" => Ok(BreakdownStatus::Approved),
            "rejected" => Ok(BreakdownStatus::Rejected),
            _ => Err(format!("Invalid breakdown status: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for s in ["backlog", "todo", "in_progress", "blocked", "done"] {
            let parsed: ItemStatus = s.parse().unwrap();
            assert_eq!(parsed.to_string(), s);
        }
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&ItemStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Urgent > Priority::High);
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }
}
