//! One-shot issue report: latest issues, one line each.

use std::io::Write;

use thiserror::Error;
use tracing::debug;

use crate::jira::{Issue, IssueSearch, JiraError, SearchRequest, ALL_BY_CREATED_DESC};

/// Fields requested by the report query.
pub const REPORT_FIELDS: &[&str] = &["key", "summary", "status", "project"];

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Jira(#[from] JiraError),

    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Search request for the first `page_size` visible issues, newest first.
pub fn report_request(page_size: u32) -> SearchRequest {
    SearchRequest::new(ALL_BY_CREATED_DESC, REPORT_FIELDS, page_size)
}

/// `[PROJECT] KEY          STATUS           SUMMARY`
///
/// Returns None when the issue lacks a project key, status or summary.
pub fn format_issue_line(issue: &Issue) -> Option<String> {
    Some(format!(
        "[{}] {:<12}  {:<15}  {}",
        issue.project_key()?,
        issue.key,
        issue.status_name()?,
        issue.summary()?
    ))
}

/// Run the report query and write one line per issue, in response order.
///
/// Returns the number of lines written.
pub async fn run_report<S, W>(search: &S, page_size: u32, out: &mut W) -> Result<usize, ReportError>
where
    S: IssueSearch + ?Sized,
    W: Write,
{
    let response = search.search(&report_request(page_size)).await?;

    let mut written = 0;
    for issue in &response.issues {
        match format_issue_line(issue) {
            Some(line) => {
                writeln!(out, "{}", line)?;
                written += 1;
            }
            None => debug!("Skipping issue {} with incomplete fields", issue.key),
        }
    }

    Ok(written)
}
