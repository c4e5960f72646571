//! Testing utilities and mock implementations.
//!
//! This module provides a mock tracker so the reporter and the synchronizer
//! can be tested without a real Jira instance.
//!
//! # Example
//!
//! ```rust,ignore
//! use jirasync_core::testing::{fixtures, MockIssueSearch};
//!
//! let search = MockIssueSearch::new();
//! search.add_issue(fixtures::status_issue("OPS-7", "Done")).await;
//! search.fail_on_call(2, JiraError::Timeout).await;
//! ```

mod mock_issue_search;

pub use mock_issue_search::MockIssueSearch;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::jira::{Issue, IssueFields, ProjectField, StatusField};

    /// Issue carrying only a status, as returned by a `fields=status` query.
    pub fn status_issue(key: &str, status: &str) -> Issue {
        Issue {
            key: key.to_string(),
            fields: IssueFields {
                status: Some(StatusField {
                    name: Some(status.to_string()),
                }),
                ..Default::default()
            },
        }
    }

    /// Issue whose response item has no status field.
    pub fn issue_without_status(key: &str) -> Issue {
        Issue {
            key: key.to_string(),
            fields: IssueFields::default(),
        }
    }

    /// Issue with the fields the report query asks for.
    pub fn report_issue(project: &str, key: &str, status: &str, summary: &str) -> Issue {
        Issue {
            key: key.to_string(),
            fields: IssueFields {
                status: Some(StatusField {
                    name: Some(status.to_string()),
                }),
                project: Some(ProjectField {
                    key: Some(project.to_string()),
                }),
                summary: Some(summary.to_string()),
            },
        }
    }

    /// Ticket keys `PREFIX-1..=PREFIX-count`.
    pub fn ticket_keys(prefix: &str, count: usize) -> Vec<String> {
        (1..=count).map(|i| format!("{}-{}", prefix, i)).collect()
    }
}
