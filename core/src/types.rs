//! Wire-format DTOs for the article API.
//!
//! # Design
//! Field names follow the server's camelCase JSON contract via serde
//! renames. Optional `ArticleData` fields skip serialization when absent so
//! the wire payload distinguishes "field not sent" from "field set". These
//! types mirror the mock-server's schema but are defined independently;
//! integration tests catch schema drift.

use serde::{Deserialize, Serialize};

/// The mutable state of an article. Created and updated through client
/// calls; the server owns the canonical copy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
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

/// Opaque user record attached to log entries. This crate never constructs
/// or inspects users; the server's payload is carried through verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct UserData(pub serde_json::Value);

/// One immutable revision event in an article's history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArticleLogEntry {
    pub rev_number: u64,
    pub user: UserData,
    pub comment: String,
    pub created_at: String,
    /// Change classification, e.g. `new`, `source`, `title`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub meta: serde_json::Map<String, serde_json::Value>,
}

/// A paginated slice of an article's revision history, requested with
/// half-open `[from, to)` offsets. `count` is the total number of entries
/// on the server, not the slice length.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArticleLog {
    pub count: u64,
    pub entries: Vec<ArticleLogEntry>,
}

/// Snapshot of one revision's raw and rendered content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArticleVersion {
    pub source: String,
    pub rendered: String,
}

/// Body payload asking the server to roll an article back to a prior
/// revision. Serializes as `{"revNumber": n}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevertRevision {
    pub rev_number: u64,
}
