//! Subscriber setup for the `atm-core` binary.
//!
//! Transaction outcomes (deposit, withdrawal, PIN rejection) are emitted on
//! [`TARGET_AUDIT`] so they can be filtered independently of the session
//! lifecycle events.

use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::AppConfig;

/// Target for per-transaction audit events
pub const TARGET_AUDIT: &str = "ATM::AUDIT";

/// Log file rotation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Hourly,
    Daily,
    #[default]
    Never,
}

impl LogRotation {
    fn appender(self, dir: &str, file: &str) -> RollingFileAppender {
        match self {
            LogRotation::Hourly => tracing_appender::rolling::hourly(dir, file),
            LogRotation::Daily => tracing_appender::rolling::daily(dir, file),
            LogRotation::Never => tracing_appender::rolling::never(dir, file),
        }
    }
}

/// Filter directive used when `RUST_LOG` is not set
pub fn filter_directive(config: &AppConfig) -> String {
    if config.audit_events {
        config.log_level.clone()
    } else {
        format!("{},{}=off", config.log_level, TARGET_AUDIT)
    }
}

/// Install the global subscriber. Keep the guard alive for the whole run,
/// dropping it flushes the file writer.
pub fn init_logging(config: &AppConfig) -> WorkerGuard {
    let file_appender = config.rotation.appender(&config.log_dir, &config.log_file);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directive(config)));

    let registry = tracing_subscriber::registry().with(filter);

    if config.use_json {
        // Audit lines are queried by target, keep it
        let file_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_writer(non_blocking)
            .with_ansi(false);
        registry.with(file_layer).init();
    } else {
        let file_layer = fmt::layer()
            .with_target(false)
            .with_writer(non_blocking)
            .with_ansi(false);
        let stdout_layer = config
            .log_to_stdout
            .then(|| fmt::layer().with_target(false).with_ansi(true));
        registry.with(file_layer).with(stdout_layer).init();
    }

    tracing::debug!(
        rotation = ?config.rotation,
        json = config.use_json,
        audit = config.audit_events,
        "Logging initialized"
    );
    guard
}
