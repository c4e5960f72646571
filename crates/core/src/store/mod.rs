//! Local record store: tracked software-state records and their tracker status.

mod sqlite_store;
mod traits;
mod types;

pub use sqlite_store::SqliteStatusStore;
pub use traits::{StatusStore, StoreError};
pub use types::{RunStatus, StatusRecord, StatusUpdate, TrackedRecord};
