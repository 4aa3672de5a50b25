use std::path::{Path, PathBuf};

use compact_str::CompactString;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    client::config::DEFAULT_ENDPOINT,
    notifier::DEFAULT_TELEGRAM_API_URL,
    result::{BotError, Result},
};

pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";
pub const RETRY_TIME: &str = "RETRY_TIME";
pub const PRACTICUM_ENDPOINT: &str = "PRACTICUM_ENDPOINT";

/// Settings read once at startup and handed to each component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub practicum_token: CompactString,
    pub telegram_token: CompactString,
    pub telegram_chat_id: CompactString,
    pub endpoint: CompactString,
    pub telegram_api_url: CompactString,
    /// Pause between polling cycles, in seconds
    pub retry_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub log_level: Option<String>,
    pub log_responses: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            practicum_token: CompactString::default(),
            telegram_token: CompactString::default(),
            telegram_chat_id: CompactString::default(),
            endpoint: DEFAULT_ENDPOINT.into(),
            telegram_api_url: DEFAULT_TELEGRAM_API_URL.into(),
            retry_interval_secs: 600,
            request_timeout_secs: 30,
            log_level: None,
            log_responses: false,
        }
    }
}

pub fn default_config_path() -> PathBuf {
    if let Some(dirs) = BaseDirs::new() {
        dirs.config_dir().join("homework-bot.toml")
    } else {
        PathBuf::from("homework-bot.toml")
    }
}

/// Load the config file if it exists; a missing file yields the defaults
pub fn load_config(config_file: &Path) -> Result<BotConfig> {
    if !config_file.exists() {
        debug!(path = %config_file.display(), "No config file, using defaults");
        return Ok(BotConfig::default());
    }

    confy::load_path(config_file)
        .map_err(|e| BotError::config_load_error(config_file.to_path_buf(), e))
}

impl BotConfig {
    /// Overlay values from the environment; any variable that is set wins over the file
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(PRACTICUM_TOKEN) {
            self.practicum_token = token.into();
        }
        if let Some(token) = lookup(TELEGRAM_TOKEN) {
            self.telegram_token = token.into();
        }
        if let Some(chat_id) = lookup(TELEGRAM_CHAT_ID) {
            self.telegram_chat_id = chat_id.into();
        }
        if let Some(endpoint) = lookup(PRACTICUM_ENDPOINT) {
            self.endpoint = endpoint.into();
        }
        if let Some(retry) = lookup(RETRY_TIME) {
            self.retry_interval_secs = retry.trim().parse().map_err(|_| {
                BotError::config_validation_error(RETRY_TIME, format!("not a number: {retry:?}"))
            })?;
        }

        Ok(self)
    }

    /// Names of the required credentials that are absent or empty
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        [
            (PRACTICUM_TOKEN, &self.practicum_token),
            (TELEGRAM_TOKEN, &self.telegram_token),
            (TELEGRAM_CHAT_ID, &self.telegram_chat_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// True when a chat message can be attempted at all
    pub fn can_notify(&self) -> bool {
        !self.telegram_token.trim().is_empty() && !self.telegram_chat_id.trim().is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(&name) = self.missing_credentials().first() {
            return Err(BotError::MissingCredential { name });
        }

        if self.retry_interval_secs == 0 {
            return Err(BotError::config_validation_error(
                "retry_interval_secs",
                "Retry interval must be greater than zero",
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(BotError::config_validation_error(
                "request_timeout_secs",
                "Request timeout must be greater than zero",
            ));
        }

        Ok(())
    }
}
