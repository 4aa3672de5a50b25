use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::result::{BotError, Result};

pub const DEFAULT_FILTER: &str = "homework_bot=info";
const LOG_FILE_PREFIX: &str = "homework-bot.log";

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set
    pub default_filter: String,
    /// Directory for rolling log files; stdout only when `None`
    pub log_dir: Option<PathBuf>,
    /// Write the file log as JSON lines
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_filter: DEFAULT_FILTER.to_string(),
            log_dir: None,
            json: false,
        }
    }
}

impl LoggingConfig {
    /// Reads `HOMEWORK_BOT_LOG_DIR` and `HOMEWORK_BOT_LOG_JSON`
    pub fn from_env() -> Self {
        let log_dir = std::env::var("HOMEWORK_BOT_LOG_DIR")
            .ok()
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);

        let json = std::env::var("HOMEWORK_BOT_LOG_JSON")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self { log_dir, json, ..Self::default() }
    }

    pub fn with_level(mut self, level: &str) -> Self {
        self.default_filter = format!("homework_bot={}", level.to_lowercase());
        self
    }
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held for the
/// lifetime of the process.
pub fn init_logging(config: LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.default_filter))
        .map_err(|e| BotError::LoggingError(e.to_string()))?;

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| {
                BotError::LoggingError(format!("cannot create {}: {e}", dir.display()))
            })?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            let layer = if config.json {
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(writer)
                    .boxed()
            } else {
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(writer)
                    .boxed()
            };
            (Some(layer), Some(guard))
        },
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| BotError::LoggingError(e.to_string()))?;

    Ok(guard)
}
