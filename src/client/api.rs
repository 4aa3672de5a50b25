//! Core HTTP client for the Practicum homework API

use chrono::Local;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::{
    config::ClientConfig,
    error::{ClientError, Result},
};

/// Pure HTTP client for the homework status endpoint
///
/// Classifies transport and HTTP outcomes; the decoded body is returned
/// without any shape checks.
#[derive(Debug)]
pub struct PracticumApi {
    client: Client,
    config: ClientConfig,
}

impl PracticumApi {
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.request.timeout)
            .build()
            .map_err(ClientError::Transport)?;

        Ok(Self { client, config })
    }

    /// Fetch homework updates newer than `from_date`
    #[instrument(skip(self), fields(endpoint = %self.config.endpoint))]
    pub async fn fetch(&self, from_date: i64) -> Result<Value> {
        let response = self
            .authenticated_request()
            .query(&[("from_date", from_date)])
            .send()
            .await?;

        self.handle_response(response).await
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Create authenticated request builder
    fn authenticated_request(&self) -> RequestBuilder {
        self.client
            .get(self.config.endpoint.as_str())
            .header("Authorization", format!("OAuth {}", self.config.token))
    }

    /// Handle HTTP response and decode the JSON body
    async fn handle_response(&self, response: Response) -> Result<Value> {
        let url_path = response.url().path().to_string();
        let status = response.status();
        let body = response.text().await?;

        if self.config.debug.log_responses {
            self.log_response_to_file(&url_path, &body);
        }

        debug!(status = status.as_u16(), body_len = body.len(), "Received API response");

        match status {
            s if s.is_success() => {
                serde_json::from_str(&body).map_err(|source| ClientError::Decode { source })
            },
            StatusCode::NOT_FOUND => Err(ClientError::EndpointNotFound {
                endpoint: self.config.endpoint.clone(),
                status: status.as_u16(),
            }),
            _ => Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                body: body.into(),
            }),
        }
    }

    /// Write a raw response body under the debug log directory
    fn log_response_to_file(&self, path: &str, body: &str) {
        let Some(log_dir) = &self.config.debug.log_directory else {
            return;
        };
        if let Err(e) = std::fs::create_dir_all(log_dir) {
            warn!(
                error = %e,
                dir = %log_dir.display(),
                "Failed to create response log directory"
            );
            return;
        }

        let stamp = Local::now().format("%Y-%m-%d_%H-%M-%S%.3f");
        let name = path.trim_matches('/').replace('/', "_");
        let log_path = log_dir.join(format!("{stamp}_{name}.json"));

        match std::fs::write(&log_path, body) {
            Ok(()) => debug!(path = %log_path.display(), "Response logged"),
            Err(e) => warn!(error = %e, path = %log_path.display(), "Failed to write response log"),
        }
    }
}
