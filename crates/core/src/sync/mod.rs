//! Tracker status synchronization.
//!
//! This module provides the batching helper and the `StatusSynchronizer`
//! that reconciles the `jira_status` side table for a run.

mod batch;
mod synchronizer;
mod types;

pub use batch::{batches, Batches};
pub use synchronizer::StatusSynchronizer;
pub use types::{SyncError, SyncSummary};

/// Keys per remote query, matching the tracker's `IN (...)` clause limit.
pub const MAX_BATCH_SIZE: usize = 50;
