pub mod config;
pub mod jira;
pub mod metrics;
pub mod report;
pub mod store;
pub mod sync;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, validate_jira_config, Config, ConfigError,
    DatabaseConfig, JiraConfig, MetricsConfig, SanitizedConfig, SyncConfig,
};
pub use jira::{
    fetch_statuses, key_in_query, Issue, IssueSearch, JiraClient, JiraError, SearchRequest,
    SearchResponse,
};
pub use report::{format_issue_line, report_request, run_report, ReportError};
pub use store::{
    RunStatus, SqliteStatusStore, StatusRecord, StatusStore, StatusUpdate, StoreError,
    TrackedRecord,
};
pub use sync::{batches, StatusSynchronizer, SyncError, SyncSummary, MAX_BATCH_SIZE};
