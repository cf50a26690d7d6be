// src/query/mod.rs
//
// Read-only views over the document. Every function here takes slices and
// returns owned results, so callers decide when to hit the store and tests
// never need a filesystem.
mod dashboard;
mod search;
mod streak;
mod timeline;

pub use dashboard::{summarize, DashboardStats, DashboardSummary, RecentItem};
pub use search::{search, SearchFilters};
pub use streak::{reflection_stats, ReflectionStats};
pub use timeline::{timeline, EventKind, TimeRange, TimelineEvent, TimelineFilter};
