//! Shared logging utilities for consistent tracing across all processes

use crate::errors::{SharedError, SharedResult};
use crate::types::ProcessId;
use chrono::{DateTime, Utc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Default filter directives for the current process at the given level
pub fn default_filter(process_id: &ProcessId, base_level: &str) -> String {
    match process_id {
        ProcessId::MixerService => {
            format!("mixer={base_level},shared={base_level},tower_http={base_level},axum={base_level}")
        }
        ProcessId::PipeSimulator => {
            format!("pipe_sim={base_level},shared={base_level}")
        }
    }
}

/// Initialize tracing subscriber with an optional log level
///
/// `RUST_LOG` wins over the level when set. The pipe simulator writes to
/// stderr because its stdout carries the status protocol.
pub fn init_tracing_with_level(log_level: Option<&str>) -> SharedResult<()> {
    use tracing_subscriber::fmt;

    let process_id = ProcessId::current();
    let base_level = log_level.unwrap_or("info");

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(process_id, base_level)))
        .map_err(|e| SharedError::InvalidConfig {
            field: "log_level".to_string(),
            value: format!("{base_level} ({e})"),
        })?;

    let result = match process_id {
        ProcessId::MixerService => fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .try_init(),
        ProcessId::PipeSimulator => fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_target(false)
            .compact()
            .try_init(),
    };

    result.map_err(|e| SharedError::LoggingInit { message: e.to_string() })
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Macro for process-aware info logging
#[macro_export]
macro_rules! process_info {
    ($process_id:expr, $($arg:tt)*) => {
        tracing::info!(
            process = %$process_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for process-aware warning logging
#[macro_export]
macro_rules! process_warn {
    ($process_id:expr, $($arg:tt)*) => {
        tracing::warn!(
            process = %$process_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for process-aware debug logging
#[macro_export]
macro_rules! process_debug {
    ($process_id:expr, $($arg:tt)*) => {
        tracing::debug!(
            process = %$process_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Contextual logging helper for startup messages
pub fn log_startup(process_id: &ProcessId, details: &str) {
    info!(
        process = %process_id,
        timestamp = format_timestamp(),
        "🚀 Starting {}",
        details
    );
}

/// Contextual logging helper for shutdown messages
pub fn log_shutdown(process_id: &ProcessId, reason: &str) {
    info!(
        process = %process_id,
        timestamp = format_timestamp(),
        "🛑 Shutting down: {}",
        reason
    );
}

/// Contextual logging helper for error conditions
pub fn log_error(process_id: &ProcessId, context: &str, error: &dyn std::fmt::Display) {
    error!(
        process = %process_id,
        timestamp = format_timestamp(),
        error = %error,
        "❌ {} failed: {}",
        context,
        error
    );
}

/// Contextual logging helper for success conditions
pub fn log_success(process_id: &ProcessId, message: &str) {
    info!(
        process = %process_id,
        timestamp = format_timestamp(),
        "✅ {}",
        message
    );
}
