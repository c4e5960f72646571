use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Conventional tracker variables (`JIRA_BASE_URL`, `JIRA_EMAIL`, `JIRA_TOKEN`).
const JIRA_ENV_KEYS: &[&str] = &["base_url", "email", "token"];

/// Load configuration from an optional file with environment variable overrides.
///
/// Precedence, lowest first: TOML file, `JIRA_*` variables, `JIRASYNC_*`
/// variables (`__` separates nested keys, e.g. `JIRASYNC_SYNC__BATCH_SIZE`).
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut figment = Figment::new();

    if let Some(path) = path {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        figment = figment.merge(Toml::file(path));
    }

    let config: Config = figment
        .merge(
            Env::prefixed("JIRA_")
                .only(JIRA_ENV_KEYS)
                .map(|key| format!("jira.{}", key).into()),
        )
        .merge(Env::prefixed("JIRASYNC_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[jira]
base_url = "https://tracker.example.com"

[sync]
batch_size = 10
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.jira.base_url, "https://tracker.example.com");
        assert_eq!(config.sync.batch_size, 10);
    }

    #[test]
    fn test_load_config_from_str_invalid_type() {
        let toml = r#"
[sync]
batch_size = "many"
"#;
        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Some(Path::new("/nonexistent/jirasync.toml")));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[jira]
base_url = "https://file.example.com"
page_size = 20

[database]
path = "/tmp/sync.db"
"#
        )
        .unwrap();

        let config = load_config(Some(temp_file.path())).unwrap();
        assert_eq!(config.jira.page_size, 20);
        assert_eq!(config.database.path.to_str().unwrap(), "/tmp/sync.db");
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "jirasync.toml",
                r#"
[jira]
base_url = "https://file.example.com"
"#,
            )?;
            jail.set_env("JIRA_BASE_URL", "https://env.example.com");
            jail.set_env("JIRA_EMAIL", "bot@example.com");
            jail.set_env("JIRASYNC_SYNC__BATCH_SIZE", "20");

            let config = load_config(Some(Path::new("jirasync.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.jira.base_url, "https://env.example.com");
            assert_eq!(config.jira.email.as_deref(), Some("bot@example.com"));
            assert_eq!(config.sync.batch_size, 20);
            Ok(())
        });
    }

    #[test]
    fn test_env_only_without_file() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("JIRA_BASE_URL", "https://env.example.com");
            jail.set_env("JIRA_TOKEN", "tok");

            let config = load_config(None).map_err(|e| e.to_string())?;
            assert_eq!(config.jira.base_url, "https://env.example.com");
            assert_eq!(config.jira.token.as_deref(), Some("tok"));
            assert_eq!(config.jira.timeout_secs, 15);
            Ok(())
        });
    }
}
