//! Subscriber installation
//!
//! Search events always go to stderr in the human-readable format. When the
//! `[logging]` section enables local files, the same events are also written
//! as JSON lines to `anonsearch.log.<date>` in the configured directory, one
//! file per day or per hour.
//!
//! ```no_run
//! use anonsearch::config::LoggingConfig;
//! use anonsearch::logging::init_logging;
//!
//! let _guard = init_logging("info", &LoggingConfig::default())?;
//! # Ok::<(), anonsearch::domain::SearchError>(())
//! ```

use crate::config::LoggingConfig;
use crate::domain::{Result, SearchError};
use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// File name prefix of rotated log files
pub const LOG_FILE_NAME: &str = "anonsearch.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps the background file writer running
///
/// Buffered lines are written out when the guard is dropped, so hold it until
/// the last search has finished.
pub struct LoggingGuard {
    file_writer: Option<WorkerGuard>,
}

impl LoggingGuard {
    /// True when events are also written to rotated files
    pub fn has_file_writer(&self) -> bool {
        self.file_writer.is_some()
    }
}

/// Installs the global subscriber
///
/// `RUST_LOG` wins over `log_level` when it is set and parses. Can only
/// succeed once per process.
///
/// # Errors
///
/// [`SearchError::Configuration`] for an unknown level or rotation, a log
/// directory that cannot be created, or a subscriber that is already installed.
pub fn init_logging(log_level: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let level = parse_log_level(log_level)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("anonsearch={}", level)));

    let mut layers: Vec<BoxedLayer> = vec![tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(filter.clone())
        .boxed()];

    let mut guard = LoggingGuard { file_writer: None };
    if config.local_enabled {
        let (writer, worker) = file_writer(config)?;
        layers.push(
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_span_events(FmtSpan::CLOSE)
                .with_writer(writer)
                .with_filter(filter)
                .boxed(),
        );
        guard.file_writer = Some(worker);
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| {
            SearchError::Configuration(format!("Failed to install log subscriber: {}", e))
        })?;

    tracing::info!(
        %level,
        local_enabled = config.local_enabled,
        local_path = %config.local_path,
        rotation = %config.local_rotation,
        "Logging initialized"
    );
    Ok(guard)
}

/// Opens the rotating appender behind a background writer thread
fn file_writer(config: &LoggingConfig) -> Result<(NonBlocking, WorkerGuard)> {
    let rotation = parse_rotation(&config.local_rotation)?;
    std::fs::create_dir_all(&config.local_path).map_err(|e| {
        SearchError::Configuration(format!(
            "Failed to create log directory {}: {}",
            config.local_path, e
        ))
    })?;
    let appender = RollingFileAppender::new(rotation, &config.local_path, LOG_FILE_NAME);
    Ok(tracing_appender::non_blocking(appender))
}

/// Parses `trace`, `debug`, `info`, `warn` or `error`, ignoring case
///
/// # Errors
///
/// [`SearchError::Configuration`] naming the accepted levels.
pub fn parse_log_level(level: &str) -> Result<Level> {
    let parsed = match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            return Err(SearchError::Configuration(format!(
                "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                level
            )))
        }
    };
    Ok(parsed)
}

fn parse_rotation(rotation: &str) -> Result<Rotation> {
    match rotation {
        "daily" => Ok(Rotation::DAILY),
        "hourly" => Ok(Rotation::HOURLY),
        other => Err(SearchError::Configuration(format!(
            "Invalid log rotation: {}. Must be one of: daily, hourly",
            other
        ))),
    }
}
