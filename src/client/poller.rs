//! Polling loop for homework status changes

use std::{convert::Infallible, sync::Arc};

use compact_str::ToCompactString;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument};

use super::{
    api::PracticumApi,
    config::{CycleOutcome, FixedInterval, PollingConfig, RetryPolicy},
};
use crate::{
    domain::{Cursor, StatusMessage},
    notifier::Notifier,
    result::CycleError,
    status, validator,
};

/// Poller that fetches, validates, maps and notifies once per cycle
///
/// Owns the cursor. Every failure is reported from here and only here, then
/// the loop sleeps and tries again.
#[derive(Debug)]
pub struct HomeworkPoller {
    api: Arc<PracticumApi>,
    notifier: Notifier,
    policy: Box<dyn RetryPolicy>,
    cursor: Cursor,
}

impl HomeworkPoller {
    pub fn new(
        api: Arc<PracticumApi>,
        notifier: Notifier,
        policy: Box<dyn RetryPolicy>,
        cursor: Cursor,
    ) -> Self {
        Self { api, notifier, policy, cursor }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Poll forever. Returns only if the process is torn down.
    pub async fn run(mut self) -> Infallible {
        info!(cursor = %self.cursor, "Starting homework poller");

        loop {
            let outcome = self.run_cycle().await;
            let delay = self.policy.delay(&outcome);
            debug!(?delay, ?outcome, "Sleeping until next cycle");
            sleep(delay).await;
        }
    }

    /// Run one fetch, validate, map and notify pass
    #[instrument(skip(self), fields(cursor = %self.cursor))]
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        match self.poll_once().await {
            Ok(Some(message)) => {
                info!(
                    homework = %message.homework.name,
                    status = %message.homework.status,
                    "Homework status changed"
                );
                self.notifier.notify(&message.text).await;
                CycleOutcome::Notified { homework: message.homework.name }
            },
            Ok(None) => CycleOutcome::NoUpdates,
            Err(e) => {
                error!(error = %e, "Polling cycle failed");
                self.notifier.notify(&e.notification()).await;
                CycleOutcome::Failed { error: e.to_compact_string() }
            },
        }
    }

    async fn poll_once(&mut self) -> Result<Option<StatusMessage>, CycleError> {
        let raw = self.api.fetch(self.cursor.value()).await?;
        let homeworks = validator::validate(&raw)?;
        let current_date = validator::current_date(&raw)?;

        // newest first, only the latest change is reported
        let message = match homeworks.first() {
            Some(homework) => Some(status::map_status(homework)?),
            None => {
                debug!(current_date, "В ответе отсутствует новый статус");
                None
            },
        };

        self.cursor.advance(current_date);
        Ok(message)
    }
}

/// Builder for HomeworkPoller with fluent API
#[derive(Debug, Default)]
pub struct HomeworkPollerBuilder {
    api: Option<Arc<PracticumApi>>,
    notifier: Option<Notifier>,
    policy: Option<Box<dyn RetryPolicy>>,
    cursor: Option<Cursor>,
}

impl HomeworkPollerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Practicum API
    pub fn api(mut self, api: Arc<PracticumApi>) -> Self {
        self.api = Some(api);
        self
    }

    pub fn notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Replace the retry policy; defaults to a fixed interval
    pub fn policy(mut self, policy: impl RetryPolicy + 'static) -> Self {
        self.policy = Some(Box::new(policy));
        self
    }

    /// Use a fixed interval taken from the polling configuration
    pub fn polling(self, config: &PollingConfig) -> Self {
        self.policy(FixedInterval::from(config))
    }

    /// Start the cursor at a given timestamp instead of now
    pub fn cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    pub fn build(self) -> Result<HomeworkPoller, String> {
        let api = self.api.ok_or("Practicum API is required")?;
        let notifier = self.notifier.ok_or("Notifier is required")?;
        let policy = self
            .policy
            .unwrap_or_else(|| Box::new(FixedInterval::from(&PollingConfig::default())));
        let cursor = self.cursor.unwrap_or_else(Cursor::now);

        Ok(HomeworkPoller::new(api, notifier, policy, cursor))
    }
}
