//! Best-effort delivery of text messages to a chat

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use compact_str::CompactString;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, instrument};

use crate::config::BotConfig;

pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Error)]
pub enum NotifyError {
    /// Carries no URL; the bot token is part of the request path
    #[error("request to chat API failed: {0}")]
    Http(reqwest::Error),

    #[error("chat API returned HTTP {status}: {body}")]
    Status { status: u16, body: CompactString },

    #[error("chat API rejected the message: {description}")]
    Rejected { description: CompactString },
}

/// Outbound side of a chat service
#[async_trait]
pub trait ChatChannel: Send + Sync {
    async fn send(&self, chat_id: &str, text: &str) -> Result<(), NotifyError>;
}

/// Whether a notification reached the chat service
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Delivery {
    Delivered,
    Failed,
}

/// Sends messages to a single chat, swallowing delivery failures
#[derive(Clone)]
pub struct Notifier {
    channel: Arc<dyn ChatChannel>,
    chat_id: CompactString,
}

impl Notifier {
    pub fn new(channel: Arc<dyn ChatChannel>, chat_id: impl Into<CompactString>) -> Self {
        Self { channel, chat_id: chat_id.into() }
    }

    /// Attempt delivery once. Failures are logged and reported as
    /// [`Delivery::Failed`], never returned as errors.
    #[instrument(skip(self, text), fields(chat_id = %self.chat_id))]
    pub async fn notify(&self, text: &str) -> Delivery {
        match self.channel.send(&self.chat_id, text).await {
            Ok(()) => {
                info!(text, "Бот отправил сообщение");
                Delivery::Delivered
            },
            Err(e) => {
                error!(error = %e, text, "Failed to deliver chat message");
                Delivery::Failed
            },
        }
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier").field("chat_id", &self.chat_id).finish()
    }
}

/// Telegram Bot API settings
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub api_url: CompactString,
    pub token: CompactString,
    pub timeout: Duration,
}

impl From<&BotConfig> for TelegramConfig {
    fn from(config: &BotConfig) -> Self {
        Self {
            api_url: config.telegram_api_url.clone(),
            token: config.telegram_token.clone(),
            timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    description: Option<CompactString>,
}

impl NotifyError {
    fn http(error: reqwest::Error) -> Self {
        Self::Http(error.without_url())
    }
}

/// Telegram Bot API channel
pub struct TelegramChannel {
    client: Client,
    api_url: CompactString,
    send_url: String,
}

impl TelegramChannel {
    pub fn new(config: &TelegramConfig) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(NotifyError::http)?;
        let api_url = CompactString::from(config.api_url.trim_end_matches('/'));
        let send_url = format!("{api_url}/bot{}/sendMessage", config.token);
        Ok(Self { client, api_url, send_url })
    }
}

impl std::fmt::Debug for TelegramChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramChannel").field("api_url", &self.api_url).finish()
    }
}

#[async_trait]
impl ChatChannel for TelegramChannel {
    async fn send(&self, chat_id: &str, text: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.send_url)
            .json(&SendMessageRequest { chat_id, text })
            .send()
            .await
            .map_err(NotifyError::http)?;

        let status = response.status();
        let body = response.text().await.map_err(NotifyError::http)?;

        if !status.is_success() {
            return Err(NotifyError::Status { status: status.as_u16(), body: body.into() });
        }

        match serde_json::from_str::<TelegramResponse>(&body) {
            Ok(TelegramResponse { ok: true, .. }) => Ok(()),
            Ok(TelegramResponse { description, .. }) => Err(NotifyError::Rejected {
                description: description.unwrap_or_default(),
            }),
            Err(e) => Err(NotifyError::Rejected { description: e.to_string().into() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, method, path},
    };

    use super::*;

    #[derive(Default)]
    struct Failing {
        attempts: Mutex<usize>,
    }

    #[async_trait]
    impl ChatChannel for Failing {
        async fn send(&self, _chat_id: &str, _text: &str) -> Result<(), NotifyError> {
            *self.attempts.lock().unwrap() += 1;
            Err(NotifyError::Rejected { description: "chat not found".into() })
        }
    }

    fn telegram_at(api_url: &str, token: &str) -> TelegramChannel {
        TelegramChannel::new(&TelegramConfig {
            api_url: api_url.into(),
            token: token.into(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    fn telegram(server: &MockServer) -> TelegramChannel {
        telegram_at(&server.uri(), "123:abc")
    }

    #[tokio::test]
    async fn failures_are_swallowed_after_one_attempt() {
        let channel = Arc::new(Failing::default());
        let notifier = Notifier::new(channel.clone(), "42");

        assert_eq!(notifier.notify("hello").await, Delivery::Failed);
        assert_eq!(*channel.attempts.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn telegram_posts_chat_and_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .and(body_json(json!({"chat_id": "42", "text": "привет"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = Notifier::new(Arc::new(telegram(&server)), "42");
        assert_eq!(notifier.notify("привет").await, Delivery::Delivered);
    }

    #[tokio::test]
    async fn telegram_error_status_fails_delivery() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(
                json!({"ok": false, "description": "Unauthorized"}),
            ))
            .mount(&server)
            .await;

        let err = telegram(&server).send("42", "hi").await.unwrap_err();
        assert!(matches!(err, NotifyError::Status { status: 401, .. }));
    }

    #[tokio::test]
    async fn telegram_not_ok_body_fails_delivery() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"ok": false, "description": "Bad Request: chat not found"}),
            ))
            .mount(&server)
            .await;

        let err = telegram(&server).send("42", "hi").await.unwrap_err();
        match err {
            NotifyError::Rejected { description } => {
                assert_eq!(description, "Bad Request: chat not found")
            },
            other => panic!("unexpected error: {other:?}"),
        }

        let notifier = Notifier::new(Arc::new(telegram(&server)), "42");
        assert_eq!(notifier.notify("hi").await, Delivery::Failed);
    }

    #[tokio::test]
    async fn transport_errors_do_not_expose_token() {
        let closed = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let channel = telegram_at(&format!("http://{closed}"), "123:SUPERSECRET");

        assert!(!format!("{channel:?}").contains("SUPERSECRET"));

        let err = channel.send("42", "hi").await.unwrap_err();
        assert!(matches!(err, NotifyError::Http(_)));
        assert!(!err.to_string().contains("SUPERSECRET"), "token leaked: {err}");
        assert!(!format!("{err:?}").contains("SUPERSECRET"), "token leaked: {err:?}");
    }
}
