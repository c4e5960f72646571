use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A locally tracked software-state record. Owned by an external process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedRecord {
    pub id: i64,
    pub run_id: String,
    /// Tracker ticket key, e.g. "PROJ-123". Empty or absent means "not tracked".
    pub ticket_key: Option<String>,
}

impl TrackedRecord {
    /// Whitespace-trimmed ticket key, None when absent or blank.
    pub fn trimmed_key(&self) -> Option<&str> {
        self.ticket_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

/// Last observed tracker status for one tracked record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub id: i64,
    pub tracked_id: i64,
    pub status: String,
    pub updated_at: DateTime<Utc>,
}

/// Queued change of an existing status record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub status_id: i64,
    pub tracked_id: i64,
    pub status: String,
}

/// A tracked record of a run joined with its stored status, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunStatus {
    pub tracked_id: i64,
    pub ticket_key: Option<String>,
    pub status: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}
