//! Trait definitions for the status store.

use thiserror::Error;

use super::{RunStatus, StatusRecord, StatusUpdate, TrackedRecord};

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

/// Local record store used by the synchronizer.
///
/// Upsert is an explicit two-step contract: `find_status` by owning record,
/// then either `insert_status` or a queued update applied through
/// `apply_status_updates`.
pub trait StatusStore: Send + Sync {
    /// Tracked records of `run_id` whose ticket key is present and not blank.
    fn tracked_with_tickets(&self, run_id: &str) -> Result<Vec<TrackedRecord>, StoreError>;

    /// Status record owned by a tracked record, if one exists.
    fn find_status(&self, tracked_id: i64) -> Result<Option<StatusRecord>, StoreError>;

    /// Create the status record for a tracked record. Committed immediately.
    fn insert_status(&self, tracked_id: i64, status: &str) -> Result<StatusRecord, StoreError>;

    /// Apply all updates in a single transaction. Returns the number of rows changed.
    fn apply_status_updates(&self, updates: &[StatusUpdate]) -> Result<usize, StoreError>;

    /// Every tracked record of `run_id` with its stored status.
    fn list_statuses(&self, run_id: &str) -> Result<Vec<RunStatus>, StoreError>;
}
