// src/query/search.rs
use crate::entity::{Item, ItemStatus, Priority};

/// Search criteria. `query` matches title/description/tags as a
/// case-insensitive substring; the remaining fields are equality filters
/// applied on top.
#[derive(Debug, Default, Clone)]
pub struct SearchFilters {
    pub query: String,
    pub status: Option<ItemStatus>,
    pub priority: Option<Priority>,
    pub depth: Option<u32>,
    pub tags: Vec<String>,
}

/// Filter and rank items. Title matches sort ahead of description/tag
/// matches; ties break by `updated_at` descending.
pub fn search(items: &[Item], filters: &SearchFilters) -> Vec<Item> {
    let needle = filters.query.trim().to_lowercase();

    let mut results: Vec<Item> = items
        .iter()
        .filter(|item| {
            if needle.is_empty() {
                return true;
            }
            item.title.to_lowercase().contains(&needle)
                || item
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
                || item.tags.iter().any(|t| t.to_lowercase().contains(&needle))
        })
        .filter(|item| filters.status.map_or(true, |s| item.status == s))
        .filter(|item| filters.priority.map_or(true, |p| item.priority == p))
        .filter(|item| filters.depth.map_or(true, |d| item.depth == d))
        .filter(|item| {
            filters.tags.is_empty() || filters.tags.iter().any(|t| item.tags.contains(t))
        })
        .cloned()
        .collect();

    if needle.is_empty() {
        results.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));
    } else {
        results.sort_by(|a, b| {
            let a_title = a.title.to_lowercase().contains(&needle);
            let b_title = b.title.to_lowercase().contains(&needle);
            b_title
                .cmp(&a_title)
                .then_with(|| b.updated_at().cmp(&a.updated_at()))
        });
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, description: Option<&str>, tags: &[&str]) -> Item {
        let mut item = Item::new(title.to_string(), None, 0);
        item.description = description.map(String::from);
        item.tags = tags.iter().map(|t| t.to_string()).collect();
        item
    }

    #[test]
    fn test_only_matching_items_returned() {
        let items = vec![
            item("fix wifi driver", None, &[]),
            item("plan vacation", None, &[]),
        ];
        let results = search(
            &items,
            &SearchFilters {
                query: "wifi".into(),
                ..Default::default()
            },
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "fix wifi driver");
    }

    #[test]
    fn test_title_matches_rank_before_description_matches() {
        let mut desc_hit = item("unrelated title", Some("mentions wifi here"), &[]);
        // desc_hit was updated more recently, but the title match still wins.
        desc_hit.updated_at = Some(chrono::Utc::now() + chrono::Duration::hours(1));
        let title_hit = item("wifi keeps dropping", None, &[]);
        let items = vec![desc_hit, title_hit];

        let results = search(
            &items,
            &SearchFilters {
                query: "wifi".into(),
                ..Default::default()
            },
        );
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "wifi keeps dropping");
    }

    #[test]
    fn test_tag_and_status_filters_combine() {
        let mut a = item("a", None, &["health"]);
        a.status = crate::entity::ItemStatus::Done;
        let b = item("b", None, &["health"]);
        let c = item("c", None, &["money"]);
        let items = vec![a, b, c];

        let results = search(
            &items,
            &SearchFilters {
                tags: vec!["health".into()],
                status: Some(crate::entity::ItemStatus::Done),
                ..Default::default()
            },
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "a");
    }

    #[test]
    fn test_empty_query_sorts_by_updated_desc() {
        let old = item("old", None, &[]);
        let mut new = item("new", None, &[]);
        new.updated_at = Some(chrono::Utc::now() + chrono::Duration::minutes(5));
        let results = search(&[old, new], &SearchFilters::default());
        assert_eq!(results[0].title, "new");
    }
}
