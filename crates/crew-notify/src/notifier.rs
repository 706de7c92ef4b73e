//! HTTP notifier

use crate::config::NotifierConfig;
use crate::error::DeliveryError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, header::CONTENT_TYPE};
use serde::Serialize;
use std::time::Duration;
use tracing::{info, instrument, warn};

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const ERROR_BODY_CHARS: usize = 500;

/// Outcome of one delivery attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryResult {
    pub success: bool,
    /// Status code returned by the endpoint, if it answered
    pub status: Option<u16>,
    pub error: Option<DeliveryError>,
}

impl DeliveryResult {
    /// Successful delivery
    pub fn delivered(status: u16) -> Self {
        Self {
            success: true,
            status: Some(status),
            error: None,
        }
    }

    /// Failed delivery
    pub fn failed(error: DeliveryError) -> Self {
        Self {
            success: false,
            status: error.status(),
            error: Some(error),
        }
    }
}

/// Something that can deliver the final report
#[async_trait]
pub trait Notify: Send + Sync {
    /// Send `body` to `destination` exactly once
    ///
    /// Never fails: problems are logged and reported in the result.
    async fn deliver(&self, destination: &str, body: &str) -> DeliveryResult;
}

#[derive(Debug, Serialize)]
struct OutboundMessage<'a> {
    number: &'a str,
    message: &'a str,
}

/// Posts `{number, message}` JSON to a messaging API
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    client: Client,
    config: NotifierConfig,
}

impl HttpNotifier {
    /// Create a notifier from configuration
    pub fn new(config: NotifierConfig) -> Result<Self, DeliveryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| DeliveryError::Setup(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &NotifierConfig {
        &self.config
    }

    /// Deliver to the configured destination
    pub async fn notify(&self, body: &str) -> DeliveryResult {
        self.deliver(&self.config.destination, body).await
    }

    async fn post(&self, destination: &str, body: &str) -> Result<u16, DeliveryError> {
        let payload = serde_json::to_string(&OutboundMessage {
            number: destination,
            message: body,
        })
        .map_err(|e| DeliveryError::Setup(e.to_string()))?;

        let response = self
            .client
            .post(self.config.endpoint.clone())
            .header("access-token", &self.config.access_token)
            .header(CONTENT_TYPE, &self.config.content_type)
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::OK {
            return Ok(status.as_u16());
        }

        let body = response.text().await.unwrap_or_default();
        Err(DeliveryError::Status {
            status: status.as_u16(),
            body: body.chars().take(ERROR_BODY_CHARS).collect(),
        })
    }
}

#[async_trait]
impl Notify for HttpNotifier {
    #[instrument(skip(self, body), fields(endpoint = %self.config.endpoint, length = body.len()))]
    async fn deliver(&self, destination: &str, body: &str) -> DeliveryResult {
        match self.post(destination, body).await {
            Ok(status) => {
                info!(status, "Report delivered");
                DeliveryResult::delivered(status)
            }
            Err(error) => {
                warn!(status = ?error.status(), error = %error, "Report delivery failed");
                DeliveryResult::failed(error)
            }
        }
    }
}
