//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Logs go to stderr so the report on stdout stays clean. With a log file,
//! records are written as JSON lines through a non-blocking appender.
//!
//! The filter comes from `DELTAVER_LOG`, then `RUST_LOG`, then the verbosity
//! flags.

use std::io;
use std::path::PathBuf;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding a filter directive for this tool only
pub const LOG_ENV: &str = "DELTAVER_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: Level,
    pub log_file: Option<PathBuf>,
}

impl LogConfig {
    /// `-q` wins over `-v`; each `-v` raises the level by one step from `warn`
    pub fn from_verbosity(verbose: u8, quiet: bool, log_file: Option<PathBuf>) -> Self {
        let level = if quiet {
            Level::ERROR
        } else {
            match verbose {
                0 => Level::WARN,
                1 => Level::INFO,
                2 => Level::DEBUG,
                _ => Level::TRACE,
            }
        };
        Self { level, log_file }
    }
}

fn filter_directive(deltaver_log: Option<String>, rust_log: Option<String>, level: Level) -> String {
    deltaver_log
        .or(rust_log)
        .filter(|directive| !directive.trim().is_empty())
        .unwrap_or_else(|| level.as_str().to_lowercase())
}

fn build_env_filter(level: Level) -> EnvFilter {
    let directive = filter_directive(
        std::env::var(LOG_ENV).ok(),
        std::env::var("RUST_LOG").ok(),
        level,
    );
    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}

/// Install the global subscriber.
///
/// The returned guard flushes the log file on drop and must be held until
/// the program exits.
pub fn init(config: &LogConfig) -> io::Result<Option<WorkerGuard>> {
    let filter = build_env_filter(config.level);

    let Some(path) = &config.log_file else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .compact()
                    .with_writer(io::stderr)
                    .with_target(false),
            )
            .init();
        return Ok(None);
    };

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().with_writer(writer))
        .init();

    Ok(Some(guard))
}
