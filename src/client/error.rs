//! Errors produced by the Practicum API client

use compact_str::CompactString;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Сбой при запросе к эндпоинту: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Эндпоинт {endpoint} недоступен. Код ответа API: {status}")]
    EndpointNotFound { endpoint: CompactString, status: u16 },

    #[error("Сбой при запросе к эндпоинту. Код ответа API: {status}")]
    UnexpectedStatus { status: u16, body: CompactString },

    #[error("Ответ API не удалось разобрать как JSON: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },

    #[error("Некорректная конфигурация клиента ({field}): {message}")]
    Config { field: &'static str, message: CompactString },
}

impl ClientError {
    pub fn config(field: &'static str, message: impl Into<CompactString>) -> Self {
        Self::Config { field, message: message.into() }
    }

    /// HTTP status reported by the endpoint, when the request got that far
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::EndpointNotFound { status, .. }
            | ClientError::UnexpectedStatus { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
