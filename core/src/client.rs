//! Stateless HTTP request builder and response parser for the article API.
//!
//! # Design
//! `ArticleClient` holds a `base_url` and a single behavior flag, and
//! carries no mutable state between calls. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. The caller executes the actual HTTP
//! round-trip, keeping the core deterministic and free of I/O dependencies.
//!
//! The client adds no interpretation beyond status classification: no
//! retries, no caching, no local validation of ids or revision ranges. A
//! malformed range or unknown id is the server's concern.

use std::collections::BTreeMap;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ArticleData, ArticleLog, ArticleVersion, RevertRevision};

/// Number of log entries requested when the caller gives no upper bound:
/// `to` defaults to `from + DEFAULT_LOG_WINDOW`.
pub const DEFAULT_LOG_WINDOW: u64 = 25;

/// Synchronous, stateless client for the article API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. The caller is responsible for executing the HTTP
/// round-trip between `build_*` and `parse_*`.
#[derive(Debug, Clone)]
pub struct ArticleClient {
    base_url: String,
    delete_sends_json: bool,
}

impl ArticleClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            delete_sends_json: true,
        }
    }

    /// Whether delete requests carry a JSON content-type header despite
    /// having no body. The upstream service historically received the
    /// header; servers that reject an empty JSON payload can turn it off.
    pub fn delete_content_type(mut self, enabled: bool) -> Self {
        self.delete_sends_json = enabled;
        self
    }

    pub fn build_create_article(&self, data: &ArticleData) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(data).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest::json(
            HttpMethod::Post,
            format!("{}/api/articles/new", self.base_url),
            body,
        ))
    }

    pub fn build_fetch_article(&self, id: &str) -> HttpRequest {
        HttpRequest::get(format!("{}/api/articles/{id}", self.base_url))
    }

    pub fn build_update_article(&self, id: &str, data: &ArticleData) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(data).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest::json(
            HttpMethod::Put,
            format!("{}/api/articles/{id}", self.base_url),
            body,
        ))
    }

    pub fn build_delete_article(&self, id: &str) -> HttpRequest {
        let headers = if self.delete_sends_json {
            vec![("content-type".to_string(), "application/json".to_string())]
        } else {
            Vec::new()
        };
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/api/articles/{id}", self.base_url),
            headers,
            body: None,
        }
    }

    /// Request the `[from, to)` slice of the article's revision log.
    /// `from` defaults to 0; `to` defaults to `from + 25`, computed from
    /// the effective `from` at call time.
    pub fn build_fetch_article_log(
        &self,
        id: &str,
        from: Option<u64>,
        to: Option<u64>,
    ) -> HttpRequest {
        let from = from.unwrap_or(0);
        let to = to.unwrap_or(from + DEFAULT_LOG_WINDOW);
        HttpRequest::get(format!(
            "{}/api/articles/{id}/log?from={from}&to={to}",
            self.base_url
        ))
    }

    pub fn build_revert_article_revision(
        &self,
        id: &str,
        rev_number: u64,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(&RevertRevision { rev_number })
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest::json(
            HttpMethod::Put,
            format!("{}/api/articles/{id}/log", self.base_url),
            body,
        ))
    }

    /// Request the `{source, rendered}` snapshot of one revision. Optional
    /// `path_params` are embedded in the query as a JSON-stringified object;
    /// when absent the parameter is omitted entirely.
    pub fn build_fetch_article_version(
        &self,
        page_id: &str,
        rev_num: u64,
        path_params: Option<&BTreeMap<String, String>>,
    ) -> Result<HttpRequest, ApiError> {
        let mut path = format!(
            "{}/api/articles/{page_id}/version?revNum={rev_num}",
            self.base_url
        );
        if let Some(params) = path_params {
            let encoded = serde_json::to_string(params)
                .map_err(|e| ApiError::SerializationError(e.to_string()))?;
            path.push_str("&pathParams=");
            path.push_str(&encoded);
        }
        Ok(HttpRequest::get(path))
    }

    pub fn parse_create_article(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 201)
    }

    pub fn parse_fetch_article(&self, response: HttpResponse) -> Result<ArticleData, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_update_article(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 200)
    }

    pub fn parse_delete_article(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    pub fn parse_fetch_article_log(&self, response: HttpResponse) -> Result<ArticleLog, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_revert_article_revision(
        &self,
        response: HttpResponse,
    ) -> Result<ArticleData, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_fetch_article_version(
        &self,
        response: HttpResponse,
    ) -> Result<ArticleVersion, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
