//! SQLite-backed status store implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{RunStatus, StatusRecord, StatusStore, StatusUpdate, StoreError, TrackedRecord};

/// SQLite-backed status store.
///
/// `current_sw_state` holds the tracked records, `jira_status` the side table
/// with one row per tracked record (unique `cve_id`).
pub struct SqliteStatusStore {
    conn: Mutex<Connection>,
}

impl SqliteStatusStore {
    /// Open the store, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS current_sw_state (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                run_id TEXT NOT NULL,
                jira_ticket TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_current_sw_state_run_id ON current_sw_state(run_id);

            CREATE TABLE IF NOT EXISTS jira_status (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                cve_id INTEGER NOT NULL UNIQUE REFERENCES current_sw_state(id),
                jira_status TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Database("connection lock poisoned".to_string()))
    }

    /// Insert a tracked record. Tracked records normally come from another
    /// process; this is used for seeding.
    pub fn add_tracked(
        &self,
        run_id: &str,
        ticket_key: Option<&str>,
    ) -> Result<TrackedRecord, StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO current_sw_state (run_id, jira_ticket) VALUES (?, ?)",
            params![run_id, ticket_key],
        )?;

        Ok(TrackedRecord {
            id: conn.last_insert_rowid(),
            run_id: run_id.to_string(),
            ticket_key: ticket_key.map(String::from),
        })
    }

    fn row_to_status(row: &rusqlite::Row) -> rusqlite::Result<StatusRecord> {
        let updated_at_str: String = row.get(3)?;
        Ok(StatusRecord {
            id: row.get(0)?,
            tracked_id: row.get(1)?,
            status: row.get(2)?,
            updated_at: parse_timestamp(&updated_at_str),
        })
    }
}

/// Timestamps are written by this store as RFC 3339; fall back to now on garbage.
fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

impl StatusStore for SqliteStatusStore {
    fn tracked_with_tickets(&self, run_id: &str) -> Result<Vec<TrackedRecord>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, run_id, jira_ticket FROM current_sw_state \
             WHERE run_id = ? AND jira_ticket IS NOT NULL \
             AND TRIM(jira_ticket, ' ' || char(9) || char(10) || char(11) || char(12) || char(13)) != '' \
             ORDER BY id",
        )?;

        let records = stmt
            .query_map(params![run_id], |row| {
                Ok(TrackedRecord {
                    id: row.get(0)?,
                    run_id: row.get(1)?,
                    ticket_key: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        // SQL TRIM only knows ASCII whitespace
        Ok(records
            .into_iter()
            .filter(|record| record.trimmed_key().is_some())
            .collect())
    }

    fn find_status(&self, tracked_id: i64) -> Result<Option<StatusRecord>, StoreError> {
        let conn = self.conn()?;
        let record = conn
            .query_row(
                "SELECT id, cve_id, jira_status, updated_at FROM jira_status WHERE cve_id = ?",
                params![tracked_id],
                Self::row_to_status,
            )
            .optional()?;
        Ok(record)
    }

    fn insert_status(&self, tracked_id: i64, status: &str) -> Result<StatusRecord, StoreError> {
        let conn = self.conn()?;
        let now = Utc::now();

        conn.execute(
            "INSERT INTO jira_status (cve_id, jira_status, updated_at) VALUES (?, ?, ?)",
            params![tracked_id, status, now.to_rfc3339()],
        )?;

        Ok(StatusRecord {
            id: conn.last_insert_rowid(),
            tracked_id,
            status: status.to_string(),
            updated_at: now,
        })
    }

    fn apply_status_updates(&self, updates: &[StatusUpdate]) -> Result<usize, StoreError> {
        if updates.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let now = Utc::now().to_rfc3339();
        let mut changed = 0;

        {
            let mut stmt =
                tx.prepare("UPDATE jira_status SET jira_status = ?, updated_at = ? WHERE id = ?")?;
            for update in updates {
                changed += stmt.execute(params![update.status, now, update.status_id])?;
            }
        }

        tx.commit()?;
        Ok(changed)
    }

    fn list_statuses(&self, run_id: &str) -> Result<Vec<RunStatus>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT s.id, s.jira_ticket, j.jira_status, j.updated_at \
             FROM current_sw_state s \
             LEFT JOIN jira_status j ON j.cve_id = s.id \
             WHERE s.run_id = ? \
             ORDER BY s.id",
        )?;

        let rows = stmt
            .query_map(params![run_id], |row| {
                let updated_at: Option<String> = row.get(3)?;
                Ok(RunStatus {
                    tracked_id: row.get(0)?,
                    ticket_key: row.get(1)?,
                    status: row.get(2)?,
                    updated_at: updated_at.as_deref().map(parse_timestamp),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> SqliteStatusStore {
        SqliteStatusStore::in_memory().unwrap()
    }

    #[test]
    fn test_tracked_with_tickets_filters_run_and_blank_keys() {
        let store = create_test_store();
        let with_key = store.add_tracked("run-1", Some("PROJ-1")).unwrap();
        store.add_tracked("run-1", None).unwrap();
        store.add_tracked("run-1", Some("")).unwrap();
        store.add_tracked("run-1", Some("   ")).unwrap();
        store.add_tracked("run-2", Some("PROJ-2")).unwrap();

        let records = store.tracked_with_tickets("run-1").unwrap();
        assert_eq!(records, vec![with_key]);
    }

    #[test]
    fn test_tracked_with_tickets_skips_whitespace_only_keys() {
        let store = create_test_store();
        store.add_tracked("run-1", Some("\t")).unwrap();
        store.add_tracked("run-1", Some("\n ")).unwrap();
        store.add_tracked("run-1", Some("\r\n\t ")).unwrap();
        store.add_tracked("run-1", Some("\u{00A0}")).unwrap();
        let padded = store.add_tracked("run-1", Some("\tPROJ-9\n")).unwrap();

        let records = store.tracked_with_tickets("run-1").unwrap();
        assert_eq!(records, vec![padded]);
    }

    #[test]
    fn test_tracked_with_tickets_unknown_run() {
        let store = create_test_store();
        store.add_tracked("run-1", Some("PROJ-1")).unwrap();
        assert!(store.tracked_with_tickets("other").unwrap().is_empty());
    }

    #[test]
    fn test_insert_and_find_status() {
        let store = create_test_store();
        let tracked = store.add_tracked("run-1", Some("PROJ-1")).unwrap();

        assert!(store.find_status(tracked.id).unwrap().is_none());

        let created = store.insert_status(tracked.id, "Open").unwrap();
        let found = store.find_status(tracked.id).unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.tracked_id, tracked.id);
        assert_eq!(found.status, "Open");
    }

    #[test]
    fn test_insert_status_twice_violates_uniqueness() {
        let store = create_test_store();
        let tracked = store.add_tracked("run-1", Some("PROJ-1")).unwrap();
        store.insert_status(tracked.id, "Open").unwrap();

        let result = store.insert_status(tracked.id, "Done");
        assert!(matches!(result, Err(StoreError::Database(_))));
    }

    #[test]
    fn test_insert_status_requires_tracked_record() {
        let store = create_test_store();
        assert!(store.insert_status(999, "Open").is_err());
    }

    #[test]
    fn test_apply_status_updates() {
        let store = create_test_store();
        let a = store.add_tracked("run-1", Some("PROJ-1")).unwrap();
        let b = store.add_tracked("run-1", Some("PROJ-2")).unwrap();
        let sa = store.insert_status(a.id, "Open").unwrap();
        let sb = store.insert_status(b.id, "Open").unwrap();

        let changed = store
            .apply_status_updates(&[
                StatusUpdate {
                    status_id: sa.id,
                    tracked_id: a.id,
                    status: "Done".to_string(),
                },
                StatusUpdate {
                    status_id: sb.id,
                    tracked_id: b.id,
                    status: "In Review".to_string(),
                },
            ])
            .unwrap();

        assert_eq!(changed, 2);
        assert_eq!(store.find_status(a.id).unwrap().unwrap().status, "Done");
        assert_eq!(
            store.find_status(b.id).unwrap().unwrap().status,
            "In Review"
        );
    }

    #[test]
    fn test_apply_no_updates() {
        let store = create_test_store();
        assert_eq!(store.apply_status_updates(&[]).unwrap(), 0);
    }

    #[test]
    fn test_list_statuses_includes_unsynced_records() {
        let store = create_test_store();
        let a = store.add_tracked("run-1", Some("PROJ-1")).unwrap();
        let b = store.add_tracked("run-1", None).unwrap();
        store.insert_status(a.id, "Open").unwrap();

        let rows = store.list_statuses("run-1").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].tracked_id, a.id);
        assert_eq!(rows[0].status.as_deref(), Some("Open"));
        assert!(rows[0].updated_at.is_some());
        assert_eq!(rows[1].tracked_id, b.id);
        assert!(rows[1].status.is_none());
    }

    #[test]
    fn test_store_persists_across_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sync.db");

        let tracked = {
            let store = SqliteStatusStore::new(&path).unwrap();
            let tracked = store.add_tracked("run-1", Some("PROJ-1")).unwrap();
            store.insert_status(tracked.id, "Open").unwrap();
            tracked
        };

        let store = SqliteStatusStore::new(&path).unwrap();
        let found = store.find_status(tracked.id).unwrap().unwrap();
        assert_eq!(found.status, "Open");
    }
}
