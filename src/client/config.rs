//! Configuration for the Practicum client and the polling loop

use std::{fmt::Debug, path::PathBuf, time::Duration};

use compact_str::CompactString;

use super::error::{ClientError, Result};
use crate::config::BotConfig;

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Main configuration for the Practicum client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Homework status endpoint
    pub endpoint: CompactString,
    /// OAuth token for the Practicum API
    pub token: CompactString,
    /// Request configuration
    pub request: RequestConfig,
    /// Debug configuration
    pub debug: DebugConfig,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Request timeout
    pub timeout: Duration,
}

/// Debug and logging configuration
#[derive(Debug, Clone)]
pub struct DebugConfig {
    /// Write every raw response body to disk
    pub log_responses: bool,
    /// Directory for storing response logs
    pub log_directory: Option<PathBuf>,
}

/// Polling loop configuration
#[derive(Debug, Clone)]
pub struct PollingConfig {
    /// Pause between two cycles
    pub retry_interval: Duration,
}

/// Result of one polling cycle, as seen by the retry policy
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// A status message was produced and handed to the notifier
    Notified { homework: CompactString },
    /// The response held no new homework
    NoUpdates,
    /// Fetch, validation or mapping failed
    Failed { error: CompactString },
}

/// Decides how long the poller sleeps after a cycle
pub trait RetryPolicy: Debug + Send + Sync {
    fn delay(&mut self, outcome: &CycleOutcome) -> Duration;
}

/// Sleeps the same interval after every cycle, whatever the outcome
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedInterval {
    interval: Duration,
}

impl FixedInterval {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl RetryPolicy for FixedInterval {
    fn delay(&mut self, _outcome: &CycleOutcome) -> Duration {
        self.interval
    }
}

impl From<&PollingConfig> for FixedInterval {
    fn from(config: &PollingConfig) -> Self {
        Self::new(config.retry_interval)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self { retry_interval: Duration::from_secs(600) }
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30) }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_responses: false,
            log_directory: Some(PathBuf::from("homework-bot-logs")),
        }
    }
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(endpoint: impl Into<CompactString>, token: impl Into<CompactString>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: token.into(),
            request: RequestConfig::default(),
            debug: DebugConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.is_empty() {
            return Err(ClientError::config("endpoint", "Endpoint cannot be empty"));
        }

        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(ClientError::config(
                "endpoint",
                "Endpoint must start with http:// or https://",
            ));
        }

        if url::Url::parse(&self.endpoint).is_err() {
            return Err(ClientError::config("endpoint", "Endpoint is not a valid URL"));
        }

        if self.token.is_empty() {
            return Err(ClientError::config("token", "Token cannot be empty"));
        }

        if self.request.timeout.is_zero() {
            return Err(ClientError::config("timeout", "Timeout must be greater than zero"));
        }

        Ok(())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request.timeout = timeout;
        self
    }

    pub fn with_debug(mut self, debug: DebugConfig) -> Self {
        self.debug = debug;
        self
    }

    /// Enable raw response logging
    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug.log_responses = enabled;
        self
    }
}

impl From<&BotConfig> for ClientConfig {
    fn from(config: &BotConfig) -> Self {
        Self::new(config.endpoint.clone(), config.practicum_token.clone())
            .with_timeout(Duration::from_secs(config.request_timeout_secs))
            .with_debug_logging(config.log_responses)
    }
}

impl From<&BotConfig> for PollingConfig {
    fn from(config: &BotConfig) -> Self {
        Self { retry_interval: Duration::from_secs(config.retry_interval_secs) }
    }
}
