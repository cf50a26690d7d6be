// src/server/mod.rs
//
// Local HTTP API for the browser dashboard. Each request opens the store
// fresh and performs one read-(modify-write) cycle; there is no shared
// in-process state beyond the data directory, so the CLI and the server
// see the same file (single writer at a time).
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{error, info};
use uuid::Uuid;

use crate::entity::{Item, ItemStatus, ItemUpdate, Priority, TaskUpdate};
use crate::error::{LifelogError, Result};
use crate::query::{
    reflection_stats, search, summarize, timeline, EventKind, SearchFilters, TimeRange,
    TimelineFilter,
};
use crate::storage::{JsonStore, NewItem};

#[derive(Clone)]
struct AppState {
    data_dir: PathBuf,
}

impl AppState {
    fn store(&self) -> JsonStore {
        JsonStore::new(&self.data_dir)
    }
}

/// Bind and serve until the process is stopped.
pub async fn run(data_dir: PathBuf, port: u16) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let app = router(AppState { data_dir });
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!("dashboard API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/items", get(list_items).post(create_item))
        .route(
            "/api/items/{id}",
            get(get_item).patch(patch_item).delete(delete_item),
        )
        .route("/api/problems", get(list_problems))
        .route("/api/tasks", get(list_tasks))
        .route("/api/tasks/{id}", patch(patch_task))
        .route("/api/notifications", get(list_notifications))
        .route("/api/notifications/{id}", patch(mark_notification_read))
        .route("/api/search", get(search_items))
        .route("/api/timeline", get(get_timeline))
        .route("/api/dashboard/summary", get(dashboard_summary))
        .route("/api/reflections", get(list_reflections).post(create_reflection))
        .route(
            "/api/reflections/{id}",
            patch(patch_reflection).delete(delete_reflection),
        )
        .route("/api/reflections/stats", get(get_reflection_stats))
        .route("/api/storage", get(get_storage))
        .with_state(state)
}

// ---- error mapping ----

struct ApiError(LifelogError);

impl From<LifelogError> for ApiError {
    fn from(e: LifelogError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            LifelogError::ItemNotFound(_)
            | LifelogError::TaskNotFound(_)
            | LifelogError::ReflectionNotFound(_) => StatusCode::NOT_FOUND,
            LifelogError::Validation(_) | LifelogError::ReflectionExists(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => {
                error!("request failed: {}", self.0);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

fn bad_request(msg: impl Into<String>) -> ApiError {
    ApiError(LifelogError::Validation(msg.into()))
}

// ---- items ----

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemsQuery {
    parent_id: Option<String>,
    depth: Option<u32>,
}

async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ItemsQuery>,
) -> ApiResult<Json<Vec<Item>>> {
    let parent = match query.parent_id.as_deref() {
        None => None,
        Some("null") | Some("") => Some(None),
        Some(raw) => {
            let id = raw.parse().map_err(|_| bad_request("invalid parentId"))?;
            Some(Some(id))
        }
    };
    let items = state.store().list_items(parent, query.depth)?;
    Ok(Json(items))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateItemBody {
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    parent_id: Option<Uuid>,
    #[serde(default)]
    priority: Option<Priority>,
    #[serde(default)]
    status: Option<ItemStatus>,
}

async fn create_item(
    State(state): State<AppState>,
    Json(body): Json<CreateItemBody>,
) -> ApiResult<(StatusCode, Json<Item>)> {
    let item = state.store().add_item(NewItem {
        title: body.title,
        description: body.description,
        parent_id: body.parent_id,
        priority: body.priority,
        status: body.status,
    })?;
    info!(item = %item.id, "item created");
    Ok((StatusCode::CREATED, Json(item)))
}

async fn get_item(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Json<Item>> {
    Ok(Json(state.store().get_item(id)?))
}

async fn patch_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<ItemUpdate>,
) -> ApiResult<Json<Item>> {
    Ok(Json(state.store().update_item(id, update)?))
}

async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let removed = state.store().delete_item(id)?;
    info!(item = %id, removed = removed.len(), "item deleted");
    Ok(Json(serde_json::json!({ "deleted": removed.len() })))
}

// ---- problems (legacy dashboard shape) ----
//
// Read-only: mutations go through /api/items, which covers everything the
// old problems route accepted.

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LegacyProblem {
    id: Uuid,
    text: String,
    status: ItemStatus,
    priority: Priority,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    blocked_by: Vec<Uuid>,
    blocking: Vec<Uuid>,
    tags: Vec<String>,
}

async fn list_problems(State(state): State<AppState>) -> ApiResult<Json<Vec<LegacyProblem>>> {
    let problems = state
        .store()
        .list_problems()?
        .into_iter()
        .map(|p| LegacyProblem {
            id: p.id,
            text: p.title.clone(),
            status: p.status,
            priority: p.priority,
            created_at: p.created_at,
            updated_at: p.updated_at(),
            blocked_by: p.blocked_by,
            blocking: p.blocking,
            tags: p.tags,
        })
        .collect();
    Ok(Json(problems))
}

// ---- tasks ----

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TasksQuery {
    problem_id: Option<Uuid>,
}

async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<TasksQuery>,
) -> ApiResult<Json<Vec<crate::entity::Task>>> {
    Ok(Json(state.store().list_tasks(query.problem_id)?))
}

async fn patch_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<TaskUpdate>,
) -> ApiResult<Json<crate::entity::Task>> {
    Ok(Json(state.store().update_task(id, update)?))
}

// ---- notifications ----

async fn list_notifications(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<crate::entity::Notification>>> {
    Ok(Json(state.store().list_notifications()?))
}

async fn mark_notification_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.store().mark_notification_read(id)?;
    Ok(StatusCode::NO_CONTENT)
}

// ---- search ----

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
    status: Option<String>,
    priority: Option<String>,
    depth: Option<String>,
    tags: Option<String>,
}

#[derive(Serialize)]
struct SearchResponse {
    results: Vec<Item>,
    total: usize,
    query: String,
}

async fn search_items(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<SearchResponse>> {
    let status = match query.status.as_deref() {
        None | Some("all") => None,
        Some(s) => Some(s.parse().map_err(|_| bad_request("invalid status"))?),
    };
    let priority = match query.priority.as_deref() {
        None | Some("all") => None,
        Some(s) => Some(s.parse().map_err(|_| bad_request("invalid priority"))?),
    };
    let depth = match query.depth.as_deref() {
        None | Some("all") => None,
        Some(s) => Some(s.parse().map_err(|_| bad_request("invalid depth"))?),
    };
    let tags: Vec<String> = query
        .tags
        .as_deref()
        .map(|t| t.split(',').filter(|s| !s.is_empty()).map(String::from).collect())
        .unwrap_or_default();

    let doc = state.store().read()?;
    let filters = SearchFilters {
        query: query.q.clone(),
        status,
        priority,
        depth,
        tags,
    };
    let results = search(&doc.items, &filters);
    Ok(Json(SearchResponse {
        total: results.len(),
        results,
        query: query.q,
    }))
}

// ---- timeline ----

#[derive(Deserialize)]
struct TimelineQuery {
    #[serde(rename = "type")]
    kind: Option<String>,
    status: Option<String>,
    range: Option<String>,
}

async fn get_timeline(
    State(state): State<AppState>,
    Query(query): Query<TimelineQuery>,
) -> ApiResult<Json<Vec<crate::query::TimelineEvent>>> {
    let kind: Option<EventKind> = match query.kind.as_deref() {
        None | Some("all") => None,
        Some(s) => Some(s.parse().map_err(|_| bad_request("invalid event type"))?),
    };
    let status = match query.status.as_deref() {
        None | Some("all") => None,
        Some(s) => Some(s.parse().map_err(|_| bad_request("invalid status"))?),
    };
    let range = query
        .range
        .as_deref()
        .map(TimeRange::parse_lenient)
        .unwrap_or_default();

    let doc = state.store().read()?;
    let filter = TimelineFilter { kind, status, range };
    Ok(Json(timeline(&doc.items, &filter, Utc::now())))
}

// ---- dashboard ----

async fn dashboard_summary(
    State(state): State<AppState>,
) -> ApiResult<Json<crate::query::DashboardSummary>> {
    let doc = state.store().read()?;
    let today_start = Local::now()
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .and_then(|dt| dt.and_local_timezone(Local).single())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);
    Ok(Json(summarize(&doc.items, today_start)))
}

// ---- reflections ----

#[derive(Deserialize)]
struct ReflectionsQuery {
    from: Option<String>,
    to: Option<String>,
    limit: Option<usize>,
}

async fn list_reflections(
    State(state): State<AppState>,
    Query(query): Query<ReflectionsQuery>,
) -> ApiResult<Json<Vec<crate::entity::Reflection>>> {
    let reflections =
        state
            .store()
            .list_reflections(query.from.as_deref(), query.to.as_deref(), query.limit)?;
    Ok(Json(reflections))
}

#[derive(Deserialize)]
struct CreateReflectionBody {
    date: Option<String>,
    content: String,
}

async fn create_reflection(
    State(state): State<AppState>,
    Json(body): Json<CreateReflectionBody>,
) -> ApiResult<(StatusCode, Json<crate::entity::Reflection>)> {
    let date = body
        .date
        .unwrap_or_else(|| Local::now().date_naive().format("%Y-%m-%d").to_string());
    let reflection = state.store().add_reflection(&date, &body.content)?;
    Ok((StatusCode::CREATED, Json(reflection)))
}

#[derive(Deserialize)]
struct PatchReflectionBody {
    content: String,
}

async fn patch_reflection(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<PatchReflectionBody>,
) -> ApiResult<Json<crate::entity::Reflection>> {
    Ok(Json(state.store().update_reflection(id, &body.content)?))
}

async fn delete_reflection(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.store().delete_reflection(id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_reflection_stats(
    State(state): State<AppState>,
) -> ApiResult<Json<crate::query::ReflectionStats>> {
    let doc = state.store().read()?;
    let stats = reflection_stats(&doc.reflections, Local::now().date_naive());
    Ok(Json(stats))
}

// ---- storage ----

async fn get_storage(
    State(state): State<AppState>,
) -> ApiResult<Json<crate::storage::Document>> {
    Ok(Json(state.store().read()?))
}
