//! HTTP client for the tracker search endpoint.
//!
//! Every request carries basic auth (when an account is configured),
//! `Accept: application/json` and the configured timeout.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use tracing::debug;

use crate::config::JiraConfig;
use crate::metrics;

use super::{IssueSearch, JiraError, SearchRequest, SearchResponse};

/// Tracker search client.
pub struct JiraClient {
    client: Client,
    search_url: String,
    email: Option<String>,
    token: Option<String>,
}

impl JiraClient {
    /// Create a new client. Fails if no base URL is configured.
    pub fn new(config: &JiraConfig) -> Result<Self, JiraError> {
        if config.base_url.trim().is_empty() {
            return Err(JiraError::NotConfigured(
                "jira.base_url is required".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            search_url: config.search_url(),
            email: config.email.clone().filter(|e| !e.is_empty()),
            token: config.token.clone(),
        })
    }

    pub fn search_url(&self) -> &str {
        &self.search_url
    }

    async fn send_search(&self, request: &SearchRequest) -> Result<SearchResponse, JiraError> {
        let mut builder = self
            .client
            .get(&self.search_url)
            .query(&request.query_pairs());

        if let Some(email) = &self.email {
            builder = builder.basic_auth(email, self.token.as_ref());
        }

        let response = builder.send().await.map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(JiraError::ApiError {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        response
            .json::<SearchResponse>()
            .await
            .map_err(|e| JiraError::ParseError(format!("Failed to parse search response: {}", e)))
    }
}

#[async_trait]
impl IssueSearch for JiraClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, JiraError> {
        debug!(
            jql = %request.jql,
            max_results = request.max_results,
            "Tracker search"
        );

        let started = Instant::now();
        let result = self.send_search(request).await;
        let outcome = if result.is_ok() { "success" } else { "error" };

        metrics::REMOTE_QUERY_DURATION
            .with_label_values(&[outcome])
            .observe(started.elapsed().as_secs_f64());
        metrics::REMOTE_QUERIES.with_label_values(&[outcome]).inc();

        result
    }
}

fn map_transport_error(e: reqwest::Error) -> JiraError {
    if e.is_timeout() {
        JiraError::Timeout
    } else if e.is_connect() {
        JiraError::ConnectionFailed(e.to_string())
    } else {
        JiraError::HttpError(e)
    }
}
