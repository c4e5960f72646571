//! Tracker status synchronization driver.
//!
//! For one run: select tracked records with a ticket key, query the tracker
//! one batch of keys at a time, create missing status records right away and
//! queue updates of existing ones, then apply all updates in one transaction.
//!
//! A failed batch aborts the run. Status records created by earlier batches
//! stay in place; queued updates are dropped.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::jira::{fetch_statuses, IssueSearch};
use crate::metrics;
use crate::store::{StatusStore, StatusUpdate};

use super::batch::batches;
use super::types::{SyncError, SyncSummary};
use super::MAX_BATCH_SIZE;

/// Reconciles stored ticket statuses with the tracker.
pub struct StatusSynchronizer {
    search: Arc<dyn IssueSearch>,
    store: Arc<dyn StatusStore>,
    batch_size: usize,
}

impl StatusSynchronizer {
    /// Create a synchronizer using the maximum batch size.
    pub fn new(search: Arc<dyn IssueSearch>, store: Arc<dyn StatusStore>) -> Self {
        Self {
            search,
            store,
            batch_size: MAX_BATCH_SIZE,
        }
    }

    /// Set keys per remote query, clamped to `1..=MAX_BATCH_SIZE`.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.clamp(1, MAX_BATCH_SIZE);
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Synchronize every tracked record of `run_id` that has a ticket key.
    pub async fn sync_run(&self, run_id: &str) -> Result<SyncSummary, SyncError> {
        let result = self.run(run_id).await;
        let outcome = match &result {
            Ok(summary) if summary.tracked == 0 => "noop",
            Ok(_) => "success",
            Err(_) => "failed",
        };
        metrics::SYNC_RUNS.with_label_values(&[outcome]).inc();
        result
    }

    async fn run(&self, run_id: &str) -> Result<SyncSummary, SyncError> {
        let tracked = self.store.tracked_with_tickets(run_id)?;

        // Several records may point at the same ticket; each key is queried once.
        let mut keys: Vec<String> = Vec::new();
        let mut owners: HashMap<String, Vec<i64>> = HashMap::new();
        let mut with_key = 0;
        for record in &tracked {
            if let Some(key) = record.trimmed_key() {
                owners
                    .entry(key.to_string())
                    .or_insert_with(|| {
                        keys.push(key.to_string());
                        Vec::new()
                    })
                    .push(record.id);
                with_key += 1;
            }
        }

        if with_key == 0 {
            info!("No tracked records with tickets for run_id={}", run_id);
            return Ok(SyncSummary::empty(run_id));
        }

        let mut summary = SyncSummary {
            run_id: run_id.to_string(),
            tracked: with_key,
            ..Default::default()
        };
        let mut pending: Vec<StatusUpdate> = Vec::new();

        for (index, batch) in batches(keys, self.batch_size).enumerate() {
            let batch_number = index + 1;
            debug!(
                "Fetching statuses for batch {} ({} keys) of run_id={}",
                batch_number,
                batch.len(),
                run_id
            );

            let statuses = match fetch_statuses(self.search.as_ref(), &batch).await {
                Ok(statuses) => statuses,
                Err(source) => {
                    error!(
                        "Tracker sync aborted for run_id={} at batch {}: {}",
                        run_id, batch_number, source
                    );
                    return Err(SyncError::Remote {
                        batch: batch_number,
                        source,
                    });
                }
            };
            summary.batches += 1;

            for key in &batch {
                let Some(ids) = owners.get(key) else {
                    continue;
                };
                let Some(status) = statuses.get(key) else {
                    debug!("No status returned for ticket {}", key);
                    summary.missing += ids.len();
                    continue;
                };

                for &tracked_id in ids {
                    match self.store.find_status(tracked_id)? {
                        None => {
                            self.store.insert_status(tracked_id, status)?;
                            summary.created += 1;
                        }
                        Some(existing) => pending.push(StatusUpdate {
                            status_id: existing.id,
                            tracked_id,
                            status: status.clone(),
                        }),
                    }
                }
            }
        }

        summary.updated = self.store.apply_status_updates(&pending)?;

        metrics::STATUS_RECORDS
            .with_label_values(&["created"])
            .inc_by(summary.created as u64);
        metrics::STATUS_RECORDS
            .with_label_values(&["updated"])
            .inc_by(summary.updated as u64);

        info!(
            "Tracker sync complete for run_id={} (created={}, updated={})",
            run_id, summary.created, summary.updated
        );

        Ok(summary)
    }
}
