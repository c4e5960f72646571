//! Tracker (Jira-compatible) search API integration.
//!
//! The `IssueSearch` trait is the single seam between the reporter/synchronizer
//! and the remote tracker, so both can run against `JiraClient` in production
//! and a mock in tests.

mod client;
mod query;
mod status;
mod types;

pub use client::JiraClient;
pub use query::{key_in_query, ALL_BY_CREATED_DESC};
pub use status::fetch_statuses;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the tracker.
#[derive(Debug, Error)]
pub enum JiraError {
    /// Request exceeded the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// Could not connect to the tracker.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Other transport failure.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Tracker answered with a non-2xx status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Response body was not a search response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing base URL).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

impl JiraError {
    /// True for non-2xx answers, false for network level failures.
    pub fn is_http_status(&self) -> bool {
        matches!(self, JiraError::ApiError { .. })
    }
}

/// Search backend for the tracker.
#[async_trait]
pub trait IssueSearch: Send + Sync {
    /// Execute a single search request (first page only).
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, JiraError>;
}
