use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub jira: JiraConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Remote tracker configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JiraConfig {
    /// Tracker base URL (e.g., "https://tracker.example.com"), no trailing slash needed.
    #[serde(default)]
    pub base_url: String,
    /// Account used for basic authentication.
    #[serde(default)]
    pub email: Option<String>,
    /// API token or password paired with `email`.
    #[serde(default)]
    pub token: Option<String>,
    /// Path of the search endpoint, appended to `base_url`.
    #[serde(default = "default_search_path")]
    pub search_path: String,
    /// Per-request timeout in seconds (default: 15)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Result cap for the report query (default: 50)
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            email: None,
            token: None,
            search_path: default_search_path(),
            timeout_secs: default_timeout(),
            page_size: default_page_size(),
        }
    }
}

impl JiraConfig {
    /// Full URL of the search endpoint.
    pub fn search_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.search_path.trim_start_matches('/')
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_search_path() -> String {
    "/rest/api/3/search".to_string()
}

fn default_timeout() -> u64 {
    15
}

fn default_page_size() -> u32 {
    50
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("jirasync.db")
}

/// Synchronizer configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncConfig {
    /// Ticket keys per remote query. Bounded by the tracker's `IN (...)` clause limit.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
        }
    }
}

fn default_batch_size() -> usize {
    crate::sync::MAX_BATCH_SIZE
}

/// Metrics export configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MetricsConfig {
    /// When set, metrics are written here in Prometheus text format after each command.
    #[serde(default)]
    pub textfile: Option<PathBuf>,
}

/// Sanitized config for logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub jira: SanitizedJiraConfig,
    pub database: DatabaseConfig,
    pub sync: SyncConfig,
    pub metrics: MetricsConfig,
}

/// Sanitized tracker config (token hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedJiraConfig {
    pub base_url: String,
    pub email: Option<String>,
    pub token_configured: bool,
    pub search_path: String,
    pub timeout_secs: u64,
    pub page_size: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            jira: SanitizedJiraConfig {
                base_url: config.jira.base_url.clone(),
                email: config.jira.email.clone(),
                token_configured: config
                    .jira
                    .token
                    .as_deref()
                    .is_some_and(|t| !t.is_empty()),
                search_path: config.jira.search_path.clone(),
                timeout_secs: config.jira.timeout_secs,
                page_size: config.jira.page_size,
            },
            database: config.database.clone(),
            sync: config.sync.clone(),
            metrics: config.metrics.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
[jira]
base_url = "https://tracker.example.com"
email = "bot@example.com"
token = "secret"
timeout_secs = 30

[database]
path = "/data/state.db"

[sync]
batch_size = 25
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.jira.base_url, "https://tracker.example.com");
        assert_eq!(config.jira.email.as_deref(), Some("bot@example.com"));
        assert_eq!(config.jira.timeout_secs, 30);
        assert_eq!(config.jira.page_size, 50);
        assert_eq!(config.database.path.to_str().unwrap(), "/data/state.db");
        assert_eq!(config.sync.batch_size, 25);
        assert!(config.metrics.textfile.is_none());
    }

    #[test]
    fn test_deserialize_empty_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.jira.base_url.is_empty());
        assert_eq!(config.jira.search_path, "/rest/api/3/search");
        assert_eq!(config.jira.timeout_secs, 15);
        assert_eq!(config.database.path.to_str().unwrap(), "jirasync.db");
        assert_eq!(config.sync.batch_size, 50);
    }

    #[test]
    fn test_search_url_joins_without_double_slash() {
        let config = JiraConfig {
            base_url: "https://tracker.example.com/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.search_url(),
            "https://tracker.example.com/rest/api/3/search"
        );
    }

    #[test]
    fn test_sanitized_config_hides_token() {
        let config = Config {
            jira: JiraConfig {
                base_url: "https://tracker.example.com".to_string(),
                email: Some("bot@example.com".to_string()),
                token: Some("secret-token".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let sanitized = SanitizedConfig::from(&config);
        assert!(sanitized.jira.token_configured);
        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("secret-token"));
    }

    #[test]
    fn test_sanitized_config_without_token() {
        let sanitized = SanitizedConfig::from(&Config::default());
        assert!(!sanitized.jira.token_configured);
    }
}
