//! jirasync command line.
//!
//! Usage:
//!     jirasync report
//!     jirasync sync <RUN_ID>
//!     jirasync show <RUN_ID>

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jirasync_core::{
    load_config, metrics, run_report, validate_config, validate_jira_config, Config, IssueSearch,
    JiraClient, SanitizedConfig, SqliteStatusStore, StatusStore, StatusSynchronizer,
};

#[derive(Parser, Debug)]
#[command(name = "jirasync", version, about = "Report and synchronize Jira ticket statuses")]
struct Args {
    /// Configuration file (TOML). Environment variables override its values.
    #[arg(long, short, env = "JIRASYNC_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the latest issues visible to the account, newest first.
    Report {
        /// Maximum issues to print (defaults to jira.page_size)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        page_size: Option<u32>,
    },
    /// Synchronize stored ticket statuses for a run.
    Sync {
        /// Run identifier
        run_id: String,
    },
    /// Print stored ticket statuses for a run.
    Show {
        /// Run identifier
        run_id: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Logs go to stderr so report output stays clean on stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = load_config(args.config.as_deref()).with_context(|| match &args.config {
        Some(path) => format!("Failed to load config from {:?}", path),
        None => "Failed to load config from environment".to_string(),
    })?;

    validate_config(&config).context("Configuration validation failed")?;
    tracing::debug!("Configuration: {:?}", SanitizedConfig::from(&config));

    let result = match &args.command {
        Command::Report { page_size } => report(&config, *page_size).await,
        Command::Sync { run_id } => sync(&config, run_id).await,
        Command::Show { run_id } => show(&config, run_id),
    };

    if let Some(path) = &config.metrics.textfile {
        if let Err(e) = metrics::write_textfile(path) {
            warn!("Failed to write metrics to {:?}: {}", path, e);
        }
    }

    result
}

/// Tracker client for the commands that reach the tracker.
fn tracker_client(config: &Config) -> Result<JiraClient> {
    validate_jira_config(&config.jira).context("Configuration validation failed")?;
    JiraClient::new(&config.jira).context("Failed to create tracker client")
}

async fn report(config: &Config, page_size: Option<u32>) -> Result<()> {
    let client = tracker_client(config)?;
    let page_size = page_size.unwrap_or(config.jira.page_size);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_report(&client, page_size, &mut out)
        .await
        .context("Report failed")?;
    out.flush()?;
    Ok(())
}

async fn sync(config: &Config, run_id: &str) -> Result<()> {
    info!("Database path: {:?}", config.database.path);

    let search: Arc<dyn IssueSearch> = Arc::new(tracker_client(config)?);
    let store: Arc<dyn StatusStore> = Arc::new(
        SqliteStatusStore::new(&config.database.path).context("Failed to open status store")?,
    );

    let summary = StatusSynchronizer::new(search, store)
        .with_batch_size(config.sync.batch_size)
        .sync_run(run_id)
        .await
        .with_context(|| format!("Synchronization failed for run_id={}", run_id))?;

    info!(
        "Run {}: {} tracked, {} queries, {} created, {} updated, {} without status",
        summary.run_id,
        summary.tracked,
        summary.batches,
        summary.created,
        summary.updated,
        summary.missing
    );
    Ok(())
}

fn show(config: &Config, run_id: &str) -> Result<()> {
    let store = SqliteStatusStore::new(&config.database.path)
        .context("Failed to open status store")?;
    let rows = store.list_statuses(run_id)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for row in rows {
        writeln!(
            out,
            "{:<8}  {:<12}  {:<15}  {}",
            row.tracked_id,
            row.ticket_key.as_deref().unwrap_or("-"),
            row.status.as_deref().unwrap_or("-"),
            row.updated_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "-".to_string())
        )?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sync_command() {
        let args = Args::try_parse_from(["jirasync", "sync", "run-42"]).unwrap();
        assert!(matches!(args.command, Command::Sync { ref run_id } if run_id == "run-42"));
    }

    #[test]
    fn test_parse_report_with_page_size() {
        let args =
            Args::try_parse_from(["jirasync", "--config", "x.toml", "report", "--page-size", "10"])
                .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("x.toml")));
        assert!(matches!(
            args.command,
            Command::Report {
                page_size: Some(10)
            }
        ));
    }

    #[test]
    fn test_report_rejects_zero_page_size() {
        assert!(Args::try_parse_from(["jirasync", "report", "--page-size", "0"]).is_err());
        assert!(Args::try_parse_from(["jirasync", "report", "--page-size", "1"]).is_ok());
    }

    #[test]
    fn test_show_does_not_need_tracker_settings() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
        assert!(tracker_client(&config).is_err());
    }

    #[test]
    fn test_sync_requires_run_id() {
        assert!(Args::try_parse_from(["jirasync", "sync"]).is_err());
    }
}
