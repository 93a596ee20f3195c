//! REST webhook client: POST one message, receive the reply array.

use async_trait::async_trait;
use tracing::debug;

use crate::messages::{self, OutboundMessage, ResponseItem};

/// Webhook used when no URL is configured.
pub const DEFAULT_WEBHOOK_URL: &str = "http://localhost:5005/webhooks/rest/webhook";

/// Exchange error.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response (connect, DNS, I/O).
    #[error("request failed: {0}")]
    Request(String),
    /// The server answered with a non-2xx status.
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
    /// The response body was not a JSON array.
    #[error("malformed reply: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Request(e.to_string())
    }
}

/// Anything that can carry one outbound message to the agent and return
/// its reply items.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_message(&self, msg: &OutboundMessage) -> Result<Vec<ResponseItem>, ClientError>;
}

/// HTTP transport for the Rasa REST channel.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    url: String,
}

impl RestClient {
    /// Client for the webhook at `url` (e.g. `http://localhost:5005/webhooks/rest/webhook`).
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), url)
    }

    pub fn with_http(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Transport for RestClient {
    async fn post_message(&self, msg: &OutboundMessage) -> Result<Vec<ResponseItem>, ClientError> {
        debug!(url = %self.url, sender = %msg.sender, len = msg.message.len(), "posting message");

        // `.json()` sets Content-Type: application/json.
        let response = self.http.post(&self.url).json(msg).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let items = messages::parse_reply(&body).map_err(ClientError::Decode)?;
        debug!(items = items.len(), "reply received");
        Ok(items)
    }
}
