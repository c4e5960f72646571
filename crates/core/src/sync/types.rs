use serde::Serialize;
use thiserror::Error;

use crate::jira::JiraError;
use crate::store::StoreError;

/// Errors that abort a synchronization run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Local store failure.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A remote batch query failed. Later batches were not attempted.
    #[error("Remote query for batch {batch} failed: {source}")]
    Remote {
        /// 1-based batch number.
        batch: usize,
        source: JiraError,
    },
}

/// Outcome of one synchronization run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub run_id: String,
    /// Tracked records with a ticket key.
    pub tracked: usize,
    /// Remote queries issued.
    pub batches: usize,
    /// Status records created.
    pub created: usize,
    /// Status records updated in place.
    pub updated: usize,
    /// Tracked records whose key came back without a status.
    pub missing: usize,
}

impl SyncSummary {
    pub fn empty(run_id: &str) -> Self {
        Self {
            run_id: run_id.to_string(),
            ..Default::default()
        }
    }
}
