// src/query/timeline.rs
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::entity::{Item, ItemStatus, Priority};
use crate::error::LifelogError;

/// What happened to an item at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Created,
    Updated,
    Completed,
}

impl std::str::FromStr for EventKind {
    type Err = LifelogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(EventKind::Created),
            "updated" => Ok(EventKind::Updated),
            "completed" => Ok(EventKind::Completed),
            other => Err(LifelogError::Validation(format!(
                "unknown event type '{}'",
                other
            ))),
        }
    }
}

/// How far back the timeline reaches. Defaults to the last 30 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    Week,
    #[default]
    Month,
    Quarter,
    All,
}

impl TimeRange {
    /// Parse `7d`/`30d`/`90d`/`all`, falling back to the default for
    /// anything unrecognized.
    pub fn parse_lenient(s: &str) -> Self {
        match s {
            "7d" => TimeRange::Week,
            "30d" => TimeRange::Month,
            "90d" => TimeRange::Quarter,
            "all" => TimeRange::All,
            _ => TimeRange::default(),
        }
    }

    fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            TimeRange::Week => Some(now - Duration::days(7)),
            TimeRange::Month => Some(now - Duration::days(30)),
            TimeRange::Quarter => Some(now - Duration::days(90)),
            TimeRange::All => None,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct TimelineFilter {
    pub kind: Option<EventKind>,
    pub status: Option<ItemStatus>,
    pub range: TimeRange,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    /// `<item-id>-<kind>`, unique per (item, event) pair.
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: ItemStatus,
    pub priority: Priority,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
    pub depth: u32,
    pub tags: Vec<String>,
}

impl TimelineEvent {
    fn from_item(item: &Item, kind: EventKind, timestamp: DateTime<Utc>) -> Self {
        let suffix = match kind {
            EventKind::Created => "created",
            EventKind::Updated => "updated",
            EventKind::Completed => "completed",
        };
        Self {
            id: format!("{}-{}", item.id, suffix),
            title: item.title.clone(),
            description: item.description.clone(),
            status: item.status,
            priority: item.priority,
            kind,
            timestamp,
            depth: item.depth,
            tags: item.tags.clone(),
        }
    }
}

/// Expand items into timeline events and filter them. Each item produces a
/// `created` event, an `updated` event when it was touched after creation,
/// and a `completed` event when its status is `done`. Newest first.
pub fn timeline(items: &[Item], filter: &TimelineFilter, now: DateTime<Utc>) -> Vec<TimelineEvent> {
    let mut events = Vec::new();
    for item in items {
        events.push(TimelineEvent::from_item(item, EventKind::Created, item.created_at));
        if item.updated_at() != item.created_at {
            events.push(TimelineEvent::from_item(
                item,
                EventKind::Updated,
                item.updated_at(),
            ));
        }
        if item.status == ItemStatus::Done {
            events.push(TimelineEvent::from_item(
                item,
                EventKind::Completed,
                item.updated_at(),
            ));
        }
    }

    let cutoff = filter.range.cutoff(now);
    let mut events: Vec<TimelineEvent> = events
        .into_iter()
        .filter(|e| filter.kind.map_or(true, |k| e.kind == k))
        .filter(|e| filter.status.map_or(true, |s| e.status == s))
        .filter(|e| cutoff.map_or(true, |c| e.timestamp >= c))
        .collect();
    events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    events
}
