use std::path::PathBuf;

use thiserror::Error;

use crate::{client::ClientError, status::StatusError, validator::ValidationError};

pub type Result<T> = std::result::Result<T, BotError>;

/// Errors that stop the bot before the polling loop starts
#[derive(Debug, Error)]
pub enum BotError {
    #[error("Отсутствует обязательная переменная окружения: '{name}'")]
    MissingCredential { name: &'static str },

    #[error("Failed to load configuration from: {path}")]
    ConfigLoadError { path: PathBuf, message: String },

    #[error("Invalid configuration: {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Failed to initialize logging: {0}")]
    LoggingError(String),
}

impl BotError {
    /// Create a configuration load error
    pub fn config_load_error(path: PathBuf, source: impl std::fmt::Display) -> Self {
        Self::ConfigLoadError { path, message: source.to_string() }
    }

    /// Create a configuration validation error
    pub fn config_validation_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidationError { field: field.into(), message: message.into() }
    }
}

/// Anything that can abort a single polling cycle
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Status(#[from] StatusError),
}

impl CycleError {
    /// Text sent to the chat when a cycle fails
    pub fn notification(&self) -> String {
        format!("Сбой в работе программы: {self}")
    }
}
