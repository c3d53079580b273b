//! Shared logging utilities for consistent tracing across the harness
//!
//! Every line carries a UTC wall-clock stamp so a failed run's timeline can be
//! rebuilt from its output alone.

use chrono::{DateTime, Utc};
use tracing::info;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

/// Timestamp layout used on every log line, e.g. `Tue Jun 13 09:41:07 UTC 2017`
pub const UTC_LOG_FORMAT: &str = "%a %b %d %H:%M:%S UTC %Y";

/// Timer printing UTC in [`UTC_LOG_FORMAT`]
#[derive(Debug, Clone, Copy, Default)]
pub struct UtcLogTimer;

impl FormatTime for UtcLogTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", format_utc(Utc::now()))
    }
}

pub fn format_utc(at: DateTime<Utc>) -> String {
    at.format(UTC_LOG_FORMAT).to_string()
}

/// Build the filter directive for the harness crates at the given level
pub fn filter_directive(log_level: Option<&str>, verbose: bool) -> String {
    let base_level = match (log_level, verbose) {
        (_, true) => "debug",
        (Some(level), false) => level,
        (None, false) => "info",
    };
    format!("tester={base_level},shared={base_level},warn")
}

/// Initialize tracing subscriber with an optional log level
pub fn init_tracing(log_level: Option<&str>, verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let directive = filter_directive(log_level, verbose);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directive));

    let result = fmt()
        .with_env_filter(filter)
        .with_timer(UtcLogTimer)
        .with_target(verbose)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();

    if result.is_err() {
        // A subscriber is already installed (tests, embedding binaries)
        return;
    }

    info!("📊 Log filter: {directive}");
}

/// Contextual logging helper for phase announcements
pub fn log_phase(run_id: &dyn std::fmt::Display, phase: &dyn std::fmt::Display, action: &str) {
    info!(
        run_id = %run_id,
        phase = %phase,
        "# {}",
        action
    );
}

/// Contextual logging helper for observed data
pub fn log_observation(run_id: &dyn std::fmt::Display, what: &str, details: &dyn std::fmt::Display) {
    info!(
        run_id = %run_id,
        "📋 {}: {}",
        what,
        details
    );
}
