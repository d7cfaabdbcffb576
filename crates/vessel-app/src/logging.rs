//! Subscriber setup: a console layer filtered by `--log-level`/config and a
//! daily-rotated file in the logs directory that keeps vessel crates at info.

use std::path::Path;

use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use vessel_config::schema::LogLevel;

/// What the log file records regardless of the console level.
const FILE_DIRECTIVE: &str = "warn,vessel=info";
const FILE_PREFIX: &str = "vessel";

/// Filter directive: `--log-level` as given, else the configured level for
/// vessel crates. Debug mode raises the default level to debug.
pub fn log_directive(cli: Option<&str>, configured: LogLevel, debug: bool) -> String {
    if let Some(level) = cli {
        return level.to_string();
    }
    let level = if debug && configured == LogLevel::Info {
        LogLevel::Debug
    } else {
        configured
    };
    format!("vessel={}", level.as_directive())
}

/// Install the global subscriber. Keep the returned guard alive until exit;
/// dropping it flushes the file writer. Without `log_dir`, or when the file
/// cannot be opened, only the console layer is installed.
pub fn init(directive: &str, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let directive: Directive = directive.parse().unwrap_or_else(|e| {
        eprintln!("invalid log level {directive:?} ({e}), using info");
        LevelFilter::INFO.into()
    });
    let console = fmt::layer().with_filter(EnvFilter::from_default_env().add_directive(directive));

    let (file, guard, file_error) = match log_dir.map(file_layer) {
        Some(Ok((layer, guard))) => (Some(layer), Some(guard), None),
        Some(Err(e)) => (None, None, Some(e)),
        None => (None, None, None),
    };

    tracing_subscriber::registry().with(console).with(file).init();

    if let Some(e) = file_error {
        tracing::warn!(error = %e, "log file unavailable, logging to console only");
    } else if let Some(dir) = log_dir {
        tracing::debug!(dir = %dir.display(), "writing log file");
    }
    guard
}

/// File layer writing `vessel.<date>.log` under `dir`, creating it if
/// needed.
fn file_layer<S>(dir: &Path) -> Result<(impl Layer<S>, WorkerGuard), InitError>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(FILE_PREFIX)
        .filename_suffix("log")
        .build(dir)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = fmt::layer()
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(EnvFilter::new(FILE_DIRECTIVE));
    Ok((layer, guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_log_level_wins() {
        assert_eq!(
            log_directive(Some("vessel_bridge=trace"), LogLevel::Warn, true),
            "vessel_bridge=trace"
        );
    }

    #[test]
    fn configured_level_applies_to_vessel_crates() {
        assert_eq!(log_directive(None, LogLevel::Info, false), "vessel=info");
        assert_eq!(log_directive(None, LogLevel::Warn, false), "vessel=warn");
    }

    #[test]
    fn debug_mode_raises_default_level() {
        assert_eq!(log_directive(None, LogLevel::Info, true), "vessel=debug");
        assert_eq!(log_directive(None, LogLevel::Error, true), "vessel=error");
    }

    #[test]
    fn log_file_keeps_vessel_info_lines() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");
        let (layer, guard) = file_layer(&logs).unwrap();

        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "vessel_app::lifecycle", session = "ab12cd34", "no update available");
            tracing::debug!(target: "vessel_app::lifecycle", "window already presented");
            tracing::info!(target: "hyper::client", "connection pooled");
            tracing::warn!(target: "hyper::client", "connection reset");
        });
        drop(guard);

        let written: String = std::fs::read_dir(&logs)
            .unwrap()
            .map(|entry| std::fs::read_to_string(entry.unwrap().path()).unwrap())
            .collect();
        assert!(written.contains("no update available"));
        assert!(written.contains("ab12cd34"));
        assert!(written.contains("connection reset"));
        assert!(!written.contains("window already presented"));
        assert!(!written.contains("connection pooled"));
    }
}
