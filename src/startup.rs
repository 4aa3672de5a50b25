//! Credential check run once before the polling loop is built

use std::sync::Arc;

use tracing::error;

use crate::{
    config::BotConfig,
    notifier::{ChatChannel, Notifier},
    result::Result,
};

/// Validate `config` before anything is polled.
///
/// Every missing credential is logged at critical severity. When the chat
/// credentials are present a single message describing the failure is sent
/// through `channel`. The error is returned so the caller exits instead of
/// building the poller.
pub async fn check_startup(config: &BotConfig, channel: Arc<dyn ChatChannel>) -> Result<()> {
    let Err(cause) = config.validate() else {
        return Ok(());
    };

    let missing = config.missing_credentials();
    for name in &missing {
        error!(
            severity = "critical",
            variable = name,
            "Отсутствует обязательная переменная окружения"
        );
    }
    if missing.is_empty() {
        error!(severity = "critical", error = %cause, "Invalid configuration");
    }

    if config.can_notify() {
        Notifier::new(channel, config.telegram_chat_id.clone())
            .notify(&cause.to_string())
            .await;
    }

    Err(cause)
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::{
        config::{PRACTICUM_TOKEN, TELEGRAM_CHAT_ID, TELEGRAM_TOKEN},
        notifier::NotifyError,
        result::BotError,
    };

    #[derive(Default)]
    struct Recording {
        sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl ChatChannel for Recording {
        async fn send(&self, chat_id: &str, text: &str) -> std::result::Result<(), NotifyError> {
            self.sent.lock().unwrap().push((chat_id.to_string(), text.to_string()));
            Ok(())
        }
    }

    fn config(pairs: &[(&str, &str)]) -> BotConfig {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        BotConfig::default().apply_env(|key| map.get(key).cloned()).unwrap()
    }

    #[tokio::test]
    async fn missing_practicum_token_sends_one_message() {
        let channel = Arc::new(Recording::default());
        let config = config(&[(TELEGRAM_TOKEN, "123:abc"), (TELEGRAM_CHAT_ID, "42")]);

        let err = check_startup(&config, channel.clone()).await.unwrap_err();
        assert!(matches!(err, BotError::MissingCredential { name: PRACTICUM_TOKEN }));

        let sent = channel.sent.lock().unwrap();
        assert_eq!(
            *sent,
            vec![(
                "42".to_string(),
                "Отсутствует обязательная переменная окружения: 'PRACTICUM_TOKEN'".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn missing_chat_credentials_send_nothing() {
        for pairs in [
            &[(PRACTICUM_TOKEN, "y0_practicum"), (TELEGRAM_CHAT_ID, "42")][..],
            &[(PRACTICUM_TOKEN, "y0_practicum"), (TELEGRAM_TOKEN, "123:abc")][..],
            &[][..],
        ] {
            let channel = Arc::new(Recording::default());
            let result = check_startup(&config(pairs), channel.clone()).await;

            assert!(matches!(result, Err(BotError::MissingCredential { .. })));
            assert!(channel.sent.lock().unwrap().is_empty(), "sent for {pairs:?}");
        }
    }

    #[tokio::test]
    async fn invalid_settings_are_reported_once() {
        let channel = Arc::new(Recording::default());
        let config = BotConfig {
            retry_interval_secs: 0,
            ..config(&[
                (PRACTICUM_TOKEN, "y0_practicum"),
                (TELEGRAM_TOKEN, "123:abc"),
                (TELEGRAM_CHAT_ID, "42"),
            ])
        };

        let err = check_startup(&config, channel.clone()).await.unwrap_err();
        assert!(matches!(err, BotError::ConfigValidationError { .. }));
        assert_eq!(channel.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn complete_config_passes_silently() {
        let channel = Arc::new(Recording::default());
        let config = config(&[
            (PRACTICUM_TOKEN, "y0_practicum"),
            (TELEGRAM_TOKEN, "123:abc"),
            (TELEGRAM_CHAT_ID, "42"),
        ]);

        assert!(check_startup(&config, channel.clone()).await.is_ok());
        assert!(channel.sent.lock().unwrap().is_empty());
    }
}
