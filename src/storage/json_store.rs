// src/storage/json_store.rs
//
// Single-file JSON persistence. Every operation is a full
// read-modify-write cycle; the file is replaced atomically via a temp
// file and rename. Only one process is expected to write at a time.
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::entity::{
    BreakdownStatus, Item, ItemStatus, ItemUpdate, Notification, Priority, Reflection, Task,
    TaskUpdate,
};
use crate::error::{LifelogError, Result};
use crate::storage::Document;

const STORAGE_FILE: &str = "problems.json";

pub struct JsonStore {
    path: PathBuf,
}

/// Creation payload for `add_item`.
#[derive(Debug, Default)]
pub struct NewItem {
    pub title: String,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
    pub priority: Option<Priority>,
    pub status: Option<ItemStatus>,
}

impl JsonStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(STORAGE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document. A missing file is a fresh journal and yields an
    /// empty document; malformed JSON is a hard error so a damaged file is
    /// never silently treated as empty and overwritten.
    pub fn read(&self) -> Result<Document> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Document::default());
            }
            Err(e) => return Err(e.into()),
        };

        let value: serde_json::Value =
            serde_json::from_str(&raw).map_err(|e| LifelogError::CorruptStorage {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        if value.get("items").is_some() || value.get("version").is_some() {
            serde_json::from_value(value).map_err(|e| LifelogError::CorruptStorage {
                path: self.path.clone(),
                reason: e.to_string(),
            })
        } else if value.get("problems").is_some() {
            migrate_v1(value).map_err(|reason| LifelogError::CorruptStorage {
                path: self.path.clone(),
                reason,
            })
        } else {
            Err(LifelogError::CorruptStorage {
                path: self.path.clone(),
                reason: "document has neither 'items' nor 'problems'".to_string(),
            })
        }
    }

    /// Write the document atomically: serialize to `<path>.tmp`, then rename
    /// over the target so readers never observe a half-written file.
    pub fn write(&self, doc: &Document) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(doc)?;
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    // ---- item hierarchy ----

    /// Add an item. Depth is derived from the parent at creation time:
    /// roots sit at depth 0 and default to `backlog`, children at
    /// `parent.depth + 1` and default to `todo`.
    pub fn add_item(&self, new: NewItem) -> Result<Item> {
        let title = new.title.trim().to_string();
        if title.is_empty() {
            return Err(LifelogError::Validation("title must not be empty".into()));
        }

        let mut doc = self.read()?;
        let depth = match new.parent_id {
            Some(pid) => {
                let parent = doc
                    .items
                    .iter()
                    .find(|i| i.id == pid)
                    .ok_or_else(|| LifelogError::ItemNotFound(pid.to_string()))?;
                parent.depth + 1
            }
            None => 0,
        };

        let mut item = Item::new(title, new.parent_id, depth);
        item.description = new.description;
        if let Some(p) = new.priority {
            item.priority = p;
        }
        if let Some(s) = new.status {
            item.status = s;
        }
        item.order = doc
            .items
            .iter()
            .filter(|i| i.parent_id == new.parent_id)
            .count() as u32;

        doc.items.push(item.clone());
        self.write(&doc)?;
        Ok(item)
    }

    pub fn get_item(&self, id: Uuid) -> Result<Item> {
        let doc = self.read()?;
        doc.items
            .into_iter()
            .find(|i| i.id == id)
            .ok_or_else(|| LifelogError::ItemNotFound(id.to_string()))
    }

    /// List items, optionally filtered by parent (`Some(None)` selects
    /// roots) and/or exact depth. Sorted by `order` within siblings.
    pub fn list_items(
        &self,
        parent: Option<Option<Uuid>>,
        depth: Option<u32>,
    ) -> Result<Vec<Item>> {
        let doc = self.read()?;
        let mut items: Vec<Item> = doc
            .items
            .into_iter()
            .filter(|i| parent.map_or(true, |p| i.parent_id == p))
            .filter(|i| depth.map_or(true, |d| i.depth == d))
            .collect();
        items.sort_by_key(|i| i.order);
        Ok(items)
    }

    pub fn update_item(&self, id: Uuid, update: ItemUpdate) -> Result<Item> {
        let mut doc = self.read()?;
        let item = doc
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| LifelogError::ItemNotFound(id.to_string()))?;

        apply_item_update(item, update);
        item.updated_at = Some(Utc::now());
        let updated = item.clone();
        self.write(&doc)?;
        Ok(updated)
    }

    /// Delete an item and every transitive descendant. Returns the removed
    /// ids. Traversal uses a worklist with a visited set, so a document
    /// whose parent links form a cycle still terminates.
    pub fn delete_item(&self, id: Uuid) -> Result<Vec<Uuid>> {
        let mut doc = self.read()?;
        if !doc.items.iter().any(|i| i.id == id) {
            return Err(LifelogError::ItemNotFound(id.to_string()));
        }

        let removed = collect_subtree(&doc.items, id);
        doc.items.retain(|i| !removed.contains(&i.id));
        self.write(&doc)?;
        Ok(removed.into_iter().collect())
    }

    // ---- problems (root items) ----

    pub fn add_problem(&self, text: &str) -> Result<Item> {
        self.add_item(NewItem {
            title: text.to_string(),
            ..Default::default()
        })
    }

    /// All root items, newest first.
    pub fn list_problems(&self) -> Result<Vec<Item>> {
        let doc = self.read()?;
        let mut roots: Vec<Item> = doc.items.into_iter().filter(|i| i.is_root()).collect();
        roots.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(roots)
    }

    /// Root items created since local midnight, newest first.
    pub fn today_problems(&self) -> Result<Vec<Item>> {
        let midnight = Local::now()
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .and_then(|dt| dt.and_local_timezone(Local).single())
            .map(|dt| dt.with_timezone(&Utc));
        let problems = self.list_problems()?;
        Ok(match midnight {
            Some(m) => problems.into_iter().filter(|p| p.created_at >= m).collect(),
            None => problems,
        })
    }

    /// Case-insensitive substring match over root item titles.
    pub fn search_problems(&self, text: &str) -> Result<Vec<Item>> {
        let needle = text.to_lowercase();
        let problems = self.list_problems()?;
        Ok(problems
            .into_iter()
            .filter(|p| p.title.to_lowercase().contains(&needle))
            .collect())
    }

    /// Delete a root item, its descendants, and every task attached to it.
    pub fn delete_problem(&self, id: Uuid) -> Result<Item> {
        let mut doc = self.read()?;
        let problem = doc
            .items
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| LifelogError::ItemNotFound(id.to_string()))?;

        let removed = collect_subtree(&doc.items, id);
        doc.items.retain(|i| !removed.contains(&i.id));
        doc.tasks.retain(|t| t.problem_id != id);
        self.write(&doc)?;
        Ok(problem)
    }

    // ---- tasks ----

    /// Tasks, optionally restricted to one problem's top-level tasks.
    pub fn list_tasks(&self, problem_id: Option<Uuid>) -> Result<Vec<Task>> {
        let doc = self.read()?;
        let mut tasks: Vec<Task> = doc
            .tasks
            .into_iter()
            .filter(|t| match problem_id {
                Some(pid) => t.problem_id == pid && t.parent_task_id.is_none(),
                None => true,
            })
            .collect();
        tasks.sort_by_key(|t| t.order);
        Ok(tasks)
    }

    pub fn update_task(&self, id: Uuid, update: TaskUpdate) -> Result<Task> {
        let mut doc = self.read()?;
        let task = doc
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| LifelogError::TaskNotFound(id.to_string()))?;

        if let Some(title) = update.title {
            task.title = title;
        }
        if let Some(description) = update.description {
            task.description = Some(description);
        }
        if let Some(status) = update.status {
            task.status = status;
        }
        if let Some(priority) = update.priority {
            task.priority = priority;
        }
        if let Some(order) = update.order {
            task.order = order;
        }
        if let Some(h) = update.estimated_hours {
            task.estimated_hours = Some(h);
        }
        if let Some(h) = update.actual_hours {
            task.actual_hours = Some(h);
        }
        task.updated_at = Some(Utc::now());
        let updated = task.clone();
        self.write(&doc)?;
        Ok(updated)
    }

    // ---- notifications ----

    /// Notifications, unread first, newest first within each group.
    pub fn list_notifications(&self) -> Result<Vec<Notification>> {
        let doc = self.read()?;
        let mut notifications = doc.notifications;
        notifications.sort_by(|a, b| {
            a.read
                .cmp(&b.read)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(notifications)
    }

    pub fn add_notification(&self, notification: Notification) -> Result<Notification> {
        let mut doc = self.read()?;
        doc.notifications.push(notification.clone());
        self.write(&doc)?;
        Ok(notification)
    }

    pub fn mark_notification_read(&self, id: Uuid) -> Result<()> {
        let mut doc = self.read()?;
        let n = doc
            .notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| LifelogError::ItemNotFound(id.to_string()))?;
        n.read = true;
        self.write(&doc)
    }

    // ---- reflections ----

    /// Add a reflection for `date` (YYYY-MM-DD). At most one reflection may
    /// exist per day.
    pub fn add_reflection(&self, date: &str, content: &str) -> Result<Reflection> {
        NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
            LifelogError::Validation(format!("invalid date '{}', expected YYYY-MM-DD", date))
        })?;
        if content.trim().is_empty() {
            return Err(LifelogError::Validation("content must not be empty".into()));
        }

        let mut doc = self.read()?;
        if doc.reflections.iter().any(|r| r.date == date) {
            return Err(LifelogError::ReflectionExists(date.to_string()));
        }
        let reflection = Reflection::new(date.to_string(), content.to_string());
        doc.reflections.push(reflection.clone());
        self.write(&doc)?;
        Ok(reflection)
    }

    pub fn update_reflection(&self, id: Uuid, content: &str) -> Result<Reflection> {
        let mut doc = self.read()?;
        let r = doc
            .reflections
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| LifelogError::ReflectionNotFound(id.to_string()))?;
        r.content = content.to_string();
        r.updated_at = Some(Utc::now());
        let updated = r.clone();
        self.write(&doc)?;
        Ok(updated)
    }

    pub fn delete_reflection(&self, id: Uuid) -> Result<()> {
        let mut doc = self.read()?;
        let before = doc.reflections.len();
        doc.reflections.retain(|r| r.id != id);
        if doc.reflections.len() == before {
            return Err(LifelogError::ReflectionNotFound(id.to_string()));
        }
        self.write(&doc)
    }

    /// Reflections filtered by inclusive date range, newest first, capped
    /// at `limit` when given.
    pub fn list_reflections(
        &self,
        from: Option<&str>,
        to: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<Reflection>> {
        let doc = self.read()?;
        let mut reflections: Vec<Reflection> = doc
            .reflections
            .into_iter()
            .filter(|r| from.map_or(true, |f| r.date.as_str() >= f))
            .filter(|r| to.map_or(true, |t| r.date.as_str() <= t))
            .collect();
        reflections.sort_by(|a, b| b.date.cmp(&a.date));
        if let Some(limit) = limit {
            reflections.truncate(limit);
        }
        Ok(reflections)
    }
}

fn apply_item_update(item: &mut Item, update: ItemUpdate) {
    if let Some(title) = update.title {
        item.title = title;
    }
    if let Some(description) = update.description {
        item.description = Some(description);
    }
    if let Some(status) = update.status {
        item.status = status;
    }
    if let Some(priority) = update.priority {
        item.priority = priority;
    }
    if let Some(bs) = update.breakdown_status {
        item.breakdown_status = bs;
    }
    if let Some(cb) = update.can_breakdown {
        item.can_breakdown = cb;
    }
    if let Some(order) = update.order {
        item.order = order;
    }
    if let Some(h) = update.estimated_hours {
        item.estimated_hours = Some(h);
    }
    if let Some(h) = update.actual_hours {
        item.actual_hours = Some(h);
    }
    if let Some(d) = update.due_date {
        item.due_date = Some(d);
    }
    if let Some(b) = update.blocked_by {
        item.blocked_by = b;
    }
    if let Some(b) = update.blocking {
        item.blocking = b;
    }
    if let Some(tags) = update.tags {
        item.tags = tags;
    }
    if let Some(ids) = update.meta_skill_ids {
        item.meta_skill_ids = ids;
    }
    if let Some(a) = update.ai_analysis {
        item.ai_analysis = Some(a);
    }
}

/// Ids of `root` and all its transitive descendants. Iterative worklist
/// with a visited set; cyclic parent links in a damaged document cannot
/// loop forever.
fn collect_subtree(items: &[Item], root: Uuid) -> HashSet<Uuid> {
    let mut visited: HashSet<Uuid> = HashSet::new();
    let mut worklist = vec![root];
    while let Some(id) = worklist.pop() {
        if !visited.insert(id) {
            continue;
        }
        for child in items.iter().filter(|i| i.parent_id == Some(id)) {
            worklist.push(child.id);
        }
    }
    visited
}

// ---- version-1 migration ----

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct V1Document {
    #[serde(default)]
    problems: Vec<V1Problem>,
    #[serde(default)]
    tasks: Vec<V1Task>,
    #[serde(default)]
    notifications: Vec<Notification>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct V1Problem {
    id: Uuid,
    text: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    status: Option<ItemStatus>,
    #[serde(default)]
    priority: Option<Priority>,
    #[serde(default)]
    breakdown_status: Option<BreakdownStatus>,
    #[serde(default)]
    blocked_by: Vec<Uuid>,
    #[serde(default)]
    blocking: Vec<Uuid>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    estimated_hours: Option<f64>,
    #[serde(default)]
    actual_hours: Option<f64>,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    ai_analysis: Option<crate::entity::AiAnalysis>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct V1Task {
    id: Uuid,
    problem_id: Option<Uuid>,
    #[serde(default)]
    parent_task_id: Option<Uuid>,
    title: String,
    #[serde(default)]
    description: Option<String>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    status: Option<ItemStatus>,
    #[serde(default)]
    priority: Option<Priority>,
    #[serde(default)]
    order: u32,
    #[serde(default)]
    can_breakdown: Option<bool>,
    #[serde(default)]
    estimated_hours: Option<f64>,
    #[serde(default)]
    actual_hours: Option<f64>,
    #[serde(default)]
    blocked_by: Vec<Uuid>,
    #[serde(default)]
    blocking: Vec<Uuid>,
}

/// Convert a version-1 document (`problems` + flat `tasks`) into the
/// unified item model: problems become root items, tasks become nested
/// items with depth computed from their parent chain.
fn migrate_v1(value: serde_json::Value) -> std::result::Result<Document, String> {
    let v1: V1Document = serde_json::from_value(value).map_err(|e| e.to_string())?;

    let mut items: Vec<Item> = Vec::with_capacity(v1.problems.len() + v1.tasks.len());
    for (index, p) in v1.problems.into_iter().enumerate() {
        items.push(Item {
            id: p.id,
            title: p.text,
            description: None,
            parent_id: None,
            depth: 0,
            order: index as u32,
            status: p.status.unwrap_or(ItemStatus::Backlog),
            priority: p.priority.unwrap_or_default(),
            breakdown_status: p.breakdown_status.unwrap_or_default(),
            can_breakdown: true,
            created_at: p.created_at,
            updated_at: p.updated_at.or(Some(p.created_at)),
            estimated_hours: p.estimated_hours,
            actual_hours: p.actual_hours,
            due_date: p.due_date,
            blocked_by: p.blocked_by,
            blocking: p.blocking,
            tags: p.tags,
            meta_skill_ids: Vec::new(),
            ai_analysis: p.ai_analysis,
        });
    }

    let parent_map: HashMap<Uuid, Uuid> = v1
        .tasks
        .iter()
        .filter_map(|t| t.parent_task_id.or(t.problem_id).map(|p| (t.id, p)))
        .collect();

    for t in v1.tasks {
        let depth = chain_depth(t.id, &parent_map);
        items.push(Item {
            id: t.id,
            title: t.title,
            description: t.description,
            parent_id: t.parent_task_id.or(t.problem_id),
            depth,
            order: t.order,
            status: t.status.unwrap_or(ItemStatus::Todo),
            priority: t.priority.unwrap_or_default(),
            breakdown_status: BreakdownStatus::Pending,
            can_breakdown: t.can_breakdown.unwrap_or(true),
            created_at: t.created_at,
            updated_at: t.updated_at.or(Some(t.created_at)),
            estimated_hours: t.estimated_hours,
            actual_hours: t.actual_hours,
            due_date: None,
            blocked_by: t.blocked_by,
            blocking: t.blocking,
            tags: Vec::new(),
            meta_skill_ids: Vec::new(),
            ai_analysis: None,
        });
    }

    Ok(Document {
        items,
        tasks: Vec::new(),
        notifications: v1.notifications,
        reflections: Vec::new(),
        meta_skills: Vec::new(),
        version: super::DOCUMENT_VERSION,
    })
}

/// Number of hops from `id` to a root via the parent map, guarded against
/// cycles.
fn chain_depth(id: Uuid, parent_map: &HashMap<Uuid, Uuid>) -> u32 {
    let mut depth = 0;
    let mut current = id;
    let mut seen = HashSet::new();
    while let Some(&parent) = parent_map.get(&current) {
        if !seen.insert(current) {
            break;
        }
        depth += 1;
        current = parent;
    }
    depth
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let (_dir, store) = store();
        let doc = store.read().unwrap();
        assert!(doc.items.is_empty());
        assert_eq!(doc.version, 2);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let (dir, store) = store();
        std::fs::write(dir.path().join("problems.json"), "{oops").unwrap();
        let err = store.read().unwrap_err();
        assert!(matches!(err, LifelogError::CorruptStorage { .. }));
    }

    #[test]
    fn test_write_then_read_round_trips() {
        let (_dir, store) = store();
        let added = store.add_problem("the build is flaky").unwrap();
        let doc = store.read().unwrap();
        assert_eq!(doc.items.len(), 1);
        assert_eq!(doc.items[0].id, added.id);
        assert_eq!(doc.items[0].title, "the build is flaky");
        assert_eq!(doc.items[0].status, ItemStatus::Backlog);
    }

    #[test]
    fn test_child_depth_is_parent_plus_one() {
        let (_dir, store) = store();
        let root = store.add_problem("refactor auth").unwrap();
        let child = store
            .add_item(NewItem {
                title: "extract session module".into(),
                parent_id: Some(root.id),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(child.depth, root.depth + 1);
        assert_eq!(child.status, ItemStatus::Todo);

        let grandchild = store
            .add_item(NewItem {
                title: "write session tests".into(),
                parent_id: Some(child.id),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(grandchild.depth, 2);
    }

    #[test]
    fn test_add_item_unknown_parent_fails() {
        let (_dir, store) = store();
        let err = store
            .add_item(NewItem {
                title: "orphan".into(),
                parent_id: Some(Uuid::new_v4()),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, LifelogError::ItemNotFound(_)));
    }

    #[test]
    fn test_empty_title_rejected() {
        let (_dir, store) = store();
        let err = store.add_problem("   ").unwrap_err();
        assert!(matches!(err, LifelogError::Validation(_)));
    }

    #[test]
    fn test_delete_removes_descendants() {
        let (_dir, store) = store();
        let root = store.add_problem("migrate database").unwrap();
        let child = store
            .add_item(NewItem {
                title: "write migration script".into(),
                parent_id: Some(root.id),
                ..Default::default()
            })
            .unwrap();
        store
            .add_item(NewItem {
                title: "test on staging".into(),
                parent_id: Some(child.id),
                ..Default::default()
            })
            .unwrap();
        let other = store.add_problem("unrelated").unwrap();

        let removed = store.delete_item(root.id).unwrap();
        assert_eq!(removed.len(), 3);

        let doc = store.read().unwrap();
        assert_eq!(doc.items.len(), 1);
        assert_eq!(doc.items[0].id, other.id);
    }

    #[test]
    fn test_delete_terminates_on_cyclic_parents() {
        let (_dir, store) = store();
        let a = store.add_problem("a").unwrap();
        let b = store
            .add_item(NewItem {
                title: "b".into(),
                parent_id: Some(a.id),
                ..Default::default()
            })
            .unwrap();
        // Corrupt the document by hand: point a's parent back at b.
        let mut doc = store.read().unwrap();
        doc.items.iter_mut().find(|i| i.id == a.id).unwrap().parent_id = Some(b.id);
        store.write(&doc).unwrap();

        let removed = store.delete_item(a.id).unwrap();
        assert_eq!(removed.len(), 2);
        assert!(store.read().unwrap().items.is_empty());
    }

    #[test]
    fn test_delete_problem_cascades_tasks() {
        let (_dir, store) = store();
        let p1 = store.add_problem("slow queries").unwrap();
        let p2 = store.add_problem("flaky tests").unwrap();

        let mut doc = store.read().unwrap();
        doc.tasks.push(Task::new("add index".into(), p1.id));
        doc.tasks.push(Task::new("profile".into(), p1.id));
        doc.tasks.push(Task::new("quarantine".into(), p2.id));
        store.write(&doc).unwrap();

        store.delete_problem(p1.id).unwrap();
        let doc = store.read().unwrap();
        assert_eq!(doc.tasks.len(), 1);
        assert_eq!(doc.tasks[0].problem_id, p2.id);
        assert!(doc.items.iter().all(|i| i.id != p1.id));
    }

    #[test]
    fn test_update_item_partial_merge() {
        let (_dir, store) = store();
        let item = store.add_problem("laptop keeps overheating").unwrap();
        let updated = store
            .update_item(
                item.id,
                ItemUpdate {
                    status: Some(ItemStatus::InProgress),
                    priority: Some(Priority::High),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.title, item.title);
        assert_eq!(updated.status, ItemStatus::InProgress);
        assert_eq!(updated.priority, Priority::High);
        assert!(updated.updated_at() >= item.updated_at());
    }

    #[test]
    fn test_v1_document_migrates_on_read() {
        let (dir, store) = store();
        let v1 = serde_json::json!({
            "problems": [
                {"id": "11111111-1111-4111-8111-111111111111",
                 "text": "learn rust", "createdAt": "2024-03-01T10:00:00Z"}
            ],
            "tasks": [
                {"id": "22222222-2222-4222-8222-222222222222",
                 "problemId": "11111111-1111-4111-8111-111111111111",
                 "title": "read the book", "status": "todo",
                 "createdAt": "2024-03-02T10:00:00Z"},
                {"id": "33333333-3333-4333-8333-333333333333",
                 "problemId": "11111111-1111-4111-8111-111111111111",
                 "parentTaskId": "22222222-2222-4222-8222-222222222222",
                 "title": "chapter 4", "status": "todo",
                 "createdAt": "2024-03-03T10:00:00Z"}
            ],
            "notifications": []
        });
        std::fs::write(
            dir.path().join("problems.json"),
            serde_json::to_string(&v1).unwrap(),
        )
        .unwrap();

        let doc = store.read().unwrap();
        assert_eq!(doc.version, 2);
        assert_eq!(doc.items.len(), 3);

        let root = doc.items.iter().find(|i| i.title == "learn rust").unwrap();
        assert_eq!(root.depth, 0);
        assert_eq!(root.status, ItemStatus::Backlog);

        let task = doc.items.iter().find(|i| i.title == "read the book").unwrap();
        assert_eq!(task.depth, 1);
        assert_eq!(task.parent_id, Some(root.id));

        let sub = doc.items.iter().find(|i| i.title == "chapter 4").unwrap();
        assert_eq!(sub.depth, 2);
        assert_eq!(sub.parent_id, Some(task.id));
    }

    #[test]
    fn test_reflection_one_per_day() {
        let (_dir, store) = store();
        store.add_reflection("2026-08-29", "good focus day").unwrap();
        let err = store.add_reflection("2026-08-29", "again").unwrap_err();
        assert!(matches!(err, LifelogError::ReflectionExists(_)));
        store.add_reflection("2026-08-30", "kept the streak").unwrap();
        assert_eq!(store.list_reflections(None, None, None).unwrap().len(), 2);
    }

    #[test]
    fn test_reflection_range_and_limit() {
        let (_dir, store) = store();
        for date in ["2026-08-01", "2026-08-02", "2026-08-03", "2026-08-04"] {
            store.add_reflection(date, "entry").unwrap();
        }
        let r = store
            .list_reflections(Some("2026-08-02"), Some("2026-08-04"), Some(2))
            .unwrap();
        assert_eq!(r.len(), 2);
        assert_eq!(r[0].date, "2026-08-04");
        assert_eq!(r[1].date, "2026-08-03");
    }

    #[test]
    fn test_notifications_unread_first() {
        use crate::entity::{Notification, NotificationKind};

        let (_dir, store) = store();
        let related = Uuid::new_v4();
        let read_one = Notification::new(
            NotificationKind::Reminder,
            "old".into(),
            "already seen".into(),
            related,
        );
        store.add_notification(read_one.clone()).unwrap();
        store.mark_notification_read(read_one.id).unwrap();
        store
            .add_notification(Notification::new(
                NotificationKind::Blocking,
                "fresh".into(),
                "still unread".into(),
                related,
            ))
            .unwrap();

        let listed = store.list_notifications().unwrap();
        assert_eq!(listed.len(), 2);
        assert!(!listed[0].read);
        assert_eq!(listed[0].title, "fresh");
        assert!(listed[1].read);
    }

    #[test]
    fn test_search_problems_case_insensitive() {
        let (_dir, store) = store();
        store.add_problem("Wifi drops on resume").unwrap();
        store.add_problem("build cache misses").unwrap();
        let hits = store.search_problems("WIFI").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Wifi drops on resume");
    }
}
