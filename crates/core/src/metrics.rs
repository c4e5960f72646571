//! Prometheus metrics.
//!
//! Commands are short-lived, so metrics are not served over HTTP. They can be
//! written to a textfile for a node-exporter textfile collector instead.

use std::path::Path;

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// Remote tracker
// =============================================================================

/// Remote search queries by result.
pub static REMOTE_QUERIES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("jirasync_remote_queries_total", "Total tracker search queries"),
        &["result"], // "success", "error"
    )
    .unwrap()
});

/// Remote search duration in seconds.
pub static REMOTE_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "jirasync_remote_query_duration_seconds",
            "Duration of tracker search queries",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 15.0]),
        &["result"],
    )
    .unwrap()
});

// =============================================================================
// Synchronizer
// =============================================================================

/// Status records written, by action.
pub static STATUS_RECORDS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "jirasync_status_records_total",
            "Status records written by the synchronizer",
        ),
        &["action"], // "created", "updated"
    )
    .unwrap()
});

/// Synchronization runs by result.
pub static SYNC_RUNS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("jirasync_sync_runs_total", "Total synchronization runs"),
        &["result"], // "success", "noop", "failed"
    )
    .unwrap()
});

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(REMOTE_QUERIES.clone()))
        .unwrap();
    registry
        .register(Box::new(REMOTE_QUERY_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(STATUS_RECORDS.clone()))
        .unwrap();
    registry.register(Box::new(SYNC_RUNS.clone())).unwrap();
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Write all metrics to `path`, replacing it atomically.
pub fn write_textfile(path: &Path) -> std::io::Result<()> {
    let tmp = path.with_extension("prom.tmp");
    std::fs::write(&tmp, encode_metrics())?;
    std::fs::rename(&tmp, path)
}
