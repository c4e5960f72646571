use super::{
    types::{Config, JiraConfig},
    ConfigError,
};
use crate::sync::MAX_BATCH_SIZE;

/// Validate configuration shared by every command.
/// Currently validates:
/// - Batch size is within the tracker's `IN (...)` clause limit
///
/// Tracker settings are checked separately by [`validate_jira_config`], only
/// for commands that talk to the tracker.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.sync.batch_size == 0 || config.sync.batch_size > MAX_BATCH_SIZE {
        return Err(ConfigError::ValidationError(format!(
            "sync.batch_size must be between 1 and {}, got {}",
            MAX_BATCH_SIZE, config.sync.batch_size
        )));
    }

    Ok(())
}

/// Validate tracker settings before any remote call.
/// - Base URL is set
/// - Timeout and page size are not 0
pub fn validate_jira_config(jira: &JiraConfig) -> Result<(), ConfigError> {
    if jira.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "jira.base_url is not set (JIRA_BASE_URL)".to_string(),
        ));
    }

    if jira.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "jira.timeout_secs cannot be 0".to_string(),
        ));
    }

    if jira.page_size == 0 {
        return Err(ConfigError::ValidationError(
            "jira.page_size cannot be 0".to_string(),
        ));
    }

    Ok(())
}
