//! Mock tracker search for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::jira::{Issue, IssueSearch, JiraError, SearchRequest, SearchResponse};

/// Mock implementation of the IssueSearch trait.
///
/// Provides controllable behavior for testing:
/// - Serve a configurable set of remote issues
/// - `key IN (...)` queries return only the requested keys, like the real tracker
/// - Track requests for assertions
/// - Simulate failures on the next call or on a specific call number
///
/// # Example
///
/// ```rust,ignore
/// use jirasync_core::testing::{MockIssueSearch, fixtures};
///
/// let search = MockIssueSearch::new();
/// search.add_issue(fixtures::status_issue("OPS-7", "In Progress")).await;
///
/// let statuses = fetch_statuses(&search, &["OPS-7".to_string()]).await?;
/// assert_eq!(search.request_count().await, 1);
/// ```
#[derive(Debug)]
pub struct MockIssueSearch {
    /// Issues known to the fake tracker, in response order.
    issues: Arc<RwLock<Vec<Issue>>>,
    /// Recorded requests.
    requests: Arc<RwLock<Vec<SearchRequest>>>,
    /// If set, the next search will fail with this error.
    next_error: Arc<RwLock<Option<JiraError>>>,
    /// If set, the search with this 1-based call number fails with the error.
    fail_on_call: Arc<RwLock<Option<(usize, JiraError)>>>,
}

impl Default for MockIssueSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl MockIssueSearch {
    /// Create a new mock with no remote issues.
    pub fn new() -> Self {
        Self {
            issues: Arc::new(RwLock::new(Vec::new())),
            requests: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            fail_on_call: Arc::new(RwLock::new(None)),
        }
    }

    /// Add a remote issue.
    pub async fn add_issue(&self, issue: Issue) {
        self.issues.write().await.push(issue);
    }

    /// Replace all remote issues.
    pub async fn set_issues(&self, issues: Vec<Issue>) {
        *self.issues.write().await = issues;
    }

    /// Get recorded requests.
    pub async fn recorded_requests(&self) -> Vec<SearchRequest> {
        self.requests.read().await.clone()
    }

    /// Get the number of searches performed.
    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }

    /// Configure the next search to fail with the given error.
    pub async fn set_next_error(&self, error: JiraError) {
        *self.next_error.write().await = Some(error);
    }

    /// Configure the `call`-th search (1-based) to fail with the given error.
    pub async fn fail_on_call(&self, call: usize, error: JiraError) {
        *self.fail_on_call.write().await = Some((call, error));
    }
}

/// Keys listed in a `key IN (...)` query, or None for any other query.
fn requested_keys(jql: &str) -> Option<Vec<String>> {
    let inner = jql.strip_prefix("key IN (")?.strip_suffix(')')?;
    Some(
        inner
            .split(',')
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect(),
    )
}

#[async_trait]
impl IssueSearch for MockIssueSearch {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, JiraError> {
        let call = {
            let mut requests = self.requests.write().await;
            requests.push(request.clone());
            requests.len()
        };

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        {
            let mut fail_on_call = self.fail_on_call.write().await;
            if matches!(fail_on_call.as_ref(), Some((n, _)) if *n == call) {
                if let Some((_, error)) = fail_on_call.take() {
                    return Err(error);
                }
            }
        }

        let issues = self.issues.read().await;
        let selected: Vec<Issue> = match requested_keys(&request.jql) {
            Some(keys) => issues
                .iter()
                .filter(|issue| keys.contains(&issue.key))
                .cloned()
                .collect(),
            None => issues.clone(),
        };

        Ok(SearchResponse {
            issues: selected
                .into_iter()
                .take(request.max_results as usize)
                .collect(),
        })
    }
}
