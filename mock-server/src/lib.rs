//! In-memory article server used by integration tests.
//!
//! Implements the article API surface: CRUD on articles plus revision
//! history (log, revert, version snapshots). Every mutation appends one
//! log entry and one version snapshot, so `revNumber` indexes both the
//! log and the version list. Rendering is a trivial paragraph-wrapping
//! stand-in for the real markup pipeline.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleData {
    pub page_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub rev_number: u64,
    pub user: Value,
    pub comment: String,
    pub created_at: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub meta: Map<String, Value>,
}

#[derive(Serialize)]
pub struct ArticleLog {
    pub count: u64,
    pub entries: Vec<LogEntry>,
}

#[derive(Clone, Debug, Serialize)]
pub struct VersionSnapshot {
    pub source: String,
    pub rendered: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevertRevision {
    pub rev_number: u64,
}

#[derive(Deserialize)]
struct LogQuery {
    from: Option<u64>,
    to: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionQuery {
    rev_num: u64,
    // Accepted for wire compatibility; rendering context is not modeled.
    #[serde(default)]
    #[allow(dead_code)]
    path_params: Option<String>,
}

/// One stored article with its full revision history. `versions[n]` and
/// `log[n]` both describe revision `n`.
pub struct ArticleRecord {
    pub data: ArticleData,
    pub versions: Vec<VersionSnapshot>,
    pub log: Vec<LogEntry>,
}

pub type Db = Arc<RwLock<HashMap<String, ArticleRecord>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/api/articles/new", post(create_article))
        .route(
            "/api/articles/{id}",
            get(fetch_article).put(update_article).delete(delete_article),
        )
        .route("/api/articles/{id}/log", get(fetch_log).put(revert_revision))
        .route("/api/articles/{id}/version", get(fetch_version))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Paragraph-wrapping stand-in for the real markup renderer.
pub fn render(source: &str) -> String {
    source
        .split("\n\n")
        .filter(|p| !p.trim().is_empty())
        .map(|p| format!("<p>{}</p>", p.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn mock_user() -> Value {
    json!({"id": Uuid::new_v4(), "username": "mock"})
}

fn snapshot(data: &ArticleData) -> VersionSnapshot {
    let source = data.source.clone().unwrap_or_default();
    VersionSnapshot {
        rendered: render(&source),
        source,
    }
}

fn log_entry(rev_number: u64, kind: &str, comment: &str, meta: Map<String, Value>) -> LogEntry {
    LogEntry {
        rev_number,
        user: mock_user(),
        comment: comment.to_string(),
        created_at: Utc::now().to_rfc3339(),
        kind: kind.to_string(),
        meta,
    }
}

/// Classify a full-replace update by the first field that changed,
/// mirroring the change types the real backend records per revision.
pub fn classify_change(old: &ArticleData, new: &ArticleData) -> Option<(String, Map<String, Value>)> {
    let mut meta = Map::new();
    if old.source != new.source {
        return Some(("source".to_string(), meta));
    }
    if old.title != new.title {
        meta.insert("prevTitle".to_string(), json!(old.title));
        meta.insert("title".to_string(), json!(new.title));
        return Some(("title".to_string(), meta));
    }
    if old.tags != new.tags {
        meta.insert("prevTags".to_string(), json!(old.tags));
        meta.insert("tags".to_string(), json!(new.tags));
        return Some(("tags".to_string(), meta));
    }
    if old.parent != new.parent {
        meta.insert("prevParent".to_string(), json!(old.parent));
        meta.insert("parent".to_string(), json!(new.parent));
        return Some(("parent".to_string(), meta));
    }
    if old.page_id != new.page_id {
        meta.insert("prevName".to_string(), json!(old.page_id));
        meta.insert("name".to_string(), json!(new.page_id));
        return Some(("name".to_string(), meta));
    }
    if old.locked != new.locked {
        meta.insert("locked".to_string(), json!(new.locked));
        return Some(("locked".to_string(), meta));
    }
    None
}

async fn create_article(
    State(db): State<Db>,
    Json(input): Json<ArticleData>,
) -> Result<StatusCode, StatusCode> {
    let mut articles = db.write().await;
    if articles.contains_key(&input.page_id) {
        return Err(StatusCode::CONFLICT);
    }
    let record = ArticleRecord {
        versions: vec![snapshot(&input)],
        log: vec![log_entry(0, "new", "Article created", Map::new())],
        data: input,
    };
    articles.insert(record.data.page_id.clone(), record);
    Ok(StatusCode::CREATED)
}

async fn fetch_article(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<ArticleData>, StatusCode> {
    let articles = db.read().await;
    articles
        .get(&id)
        .map(|r| Json(r.data.clone()))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_article(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<ArticleData>,
) -> Result<Json<ArticleData>, StatusCode> {
    let mut articles = db.write().await;
    let record = articles.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some((kind, meta)) = classify_change(&record.data, &input) {
        let rev = record.log.len() as u64;
        record.versions.push(snapshot(&input));
        record.log.push(log_entry(rev, &kind, "Article updated", meta));
    }
    record.data = input;
    Ok(Json(record.data.clone()))
}

async fn delete_article(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    let mut articles = db.write().await;
    articles
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn fetch_log(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(range): Query<LogQuery>,
) -> Result<Json<ArticleLog>, StatusCode> {
    let articles = db.read().await;
    let record = articles.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let from = range.from.unwrap_or(0);
    let to = range.to.unwrap_or(from + 25);
    Ok(Json(ArticleLog {
        count: record.log.len() as u64,
        entries: slice_log(&record.log, from, to),
    }))
}

/// The chronological `[from, to)` slice of the log; out-of-range offsets
/// clamp to an empty result rather than erroring.
pub fn slice_log(log: &[LogEntry], from: u64, to: u64) -> Vec<LogEntry> {
    let len = log.len() as u64;
    let from = from.min(len) as usize;
    let to = to.min(len) as usize;
    if to <= from {
        return Vec::new();
    }
    log[from..to].to_vec()
}

async fn revert_revision(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<RevertRevision>,
) -> Result<Json<ArticleData>, StatusCode> {
    let mut articles = db.write().await;
    let record = articles.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    let target = record
        .versions
        .get(input.rev_number as usize)
        .ok_or(StatusCode::BAD_REQUEST)?
        .clone();
    record.data.source = Some(target.source);
    let rev = record.log.len() as u64;
    record.versions.push(snapshot(&record.data));
    let mut meta = Map::new();
    meta.insert("revNumber".to_string(), json!(input.rev_number));
    record
        .log
        .push(log_entry(rev, "reverted", "Article reverted", meta));
    Ok(Json(record.data.clone()))
}

async fn fetch_version(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(query): Query<VersionQuery>,
) -> Result<Json<VersionSnapshot>, StatusCode> {
    let articles = db.read().await;
    let record = articles.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    record
        .versions
        .get(query.rev_num as usize)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}
