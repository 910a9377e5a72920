//! Synchronous API client core for the article service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//!
//! # Design
//! - `ArticleClient` is stateless — it holds only `base_url` and a delete
//!   content-type flag.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - No retries, caching or local validation: failures surface as typed
//!   errors and everything else is the server's concern.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::{ArticleClient, DEFAULT_LOG_WINDOW};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{ArticleData, ArticleLog, ArticleLogEntry, ArticleVersion, RevertRevision, UserData};
