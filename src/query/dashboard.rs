// src/query/dashboard.rs
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::entity::{Item, ItemStatus, Priority};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_items: usize,
    pub active_items: usize,
    pub completed_today: usize,
    pub in_progress: usize,
    pub blocked: usize,
    pub high_priority: usize,
    pub completion_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentItem {
    pub id: Uuid,
    pub title: String,
    pub status: ItemStatus,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub stats: DashboardStats,
    pub recent_items: Vec<RecentItem>,
}

/// Single pass over all items: counts, completion rate as a percentage,
/// and the 10 most recently updated items. `today_start` is the caller's
/// local midnight.
pub fn summarize(items: &[Item], today_start: DateTime<Utc>) -> DashboardSummary {
    let mut active = 0;
    let mut completed = 0;
    let mut completed_today = 0;
    let mut in_progress = 0;
    let mut blocked = 0;
    let mut high_priority = 0;

    for item in items {
        match item.status {
            ItemStatus::Done => {
                completed += 1;
                if item.updated_at() >= today_start {
                    completed_today += 1;
                }
            }
            ItemStatus::InProgress => {
                active += 1;
                in_progress += 1;
            }
            ItemStatus::Blocked => {
                active += 1;
                blocked += 1;
            }
            _ => active += 1,
        }
        if item.priority >= Priority::High && item.status != ItemStatus::Done {
            high_priority += 1;
        }
    }

    let total = items.len();
    let completion_rate = if total > 0 {
        completed as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    let mut by_recency: Vec<&Item> = items.iter().collect();
    by_recency.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));
    let recent_items = by_recency
        .into_iter()
        .take(10)
        .map(|i| RecentItem {
            id: i.id,
            title: i.title.clone(),
            status: i.status,
            updated_at: i.updated_at(),
        })
        .collect();

    DashboardSummary {
        stats: DashboardStats {
            total_items: total,
            active_items: active,
            completed_today,
            in_progress,
            blocked,
            high_priority,
            completion_rate,
        },
        recent_items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_with(status: ItemStatus, priority: Priority) -> Item {
        let mut item = Item::new("x".to_string(), None, 0);
        item.status = status;
        item.priority = priority;
        item
    }

    #[test]
    fn test_counts_and_completion_rate() {
        let items = vec![
            item_with(ItemStatus::Done, Priority::Medium),
            item_with(ItemStatus::InProgress, Priority::High),
            item_with(ItemStatus::Blocked, Priority::Urgent),
            item_with(ItemStatus::Todo, Priority::Low),
        ];
        let today_start = Utc::now() - chrono::Duration::hours(1);
        let summary = summarize(&items, today_start);

        assert_eq!(summary.stats.total_items, 4);
        assert_eq!(summary.stats.active_items, 3);
        assert_eq!(summary.stats.completed_today, 1);
        assert_eq!(summary.stats.in_progress, 1);
        assert_eq!(summary.stats.blocked, 1);
        assert_eq!(summary.stats.high_priority, 2);
        assert!((summary.stats.completion_rate - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_document() {
        let summary = summarize(&[], Utc::now());
        assert_eq!(summary.stats.total_items, 0);
        assert_eq!(summary.stats.completion_rate, 0.0);
        assert!(summary.recent_items.is_empty());
    }

    #[test]
    fn test_recent_items_capped_at_ten() {
        let items: Vec<Item> = (0..15)
            .map(|i| Item::new(format!("item {}", i), None, 0))
            .collect();
        let summary = summarize(&items, Utc::now());
        assert_eq!(summary.recent_items.len(), 10);
    }

    #[test]
    fn test_done_yesterday_not_completed_today() {
        let mut item = item_with(ItemStatus::Done, Priority::Medium);
        item.updated_at = Some(Utc::now() - chrono::Duration::days(2));
        let today_start = Utc::now() - chrono::Duration::hours(8);
        let summary = summarize(&[item], today_start);
        assert_eq!(summary.stats.completed_today, 0);
    }
}
