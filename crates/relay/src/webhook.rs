use std::time::Duration;

use {reqwest::StatusCode, tracing::debug};

use crate::{Result, message::OutboundPayload};

/// Upper bound on a single webhook request.
pub const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of a webhook POST that reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Accepted { status: StatusCode },
    /// Any status >= 400, including non-standard codes above 599; the body is
    /// kept for the log.
    Rejected { status: StatusCode, body: String },
}

/// Webhook HTTP client, owned by one session and dropped with it.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    http: reqwest::Client,
}

impl WebhookClient {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .build()?;
        Ok(Self { http })
    }

    /// POST `payload` as JSON to its webhook URL. Never retried.
    pub async fn execute(&self, payload: &OutboundPayload) -> Result<Delivery> {
        let resp = self
            .http
            .post(&payload.webhook_url)
            .json(payload)
            .send()
            .await?;
        let status = resp.status();
        if status.as_u16() >= 400 {
            let body = resp.text().await.unwrap_or_default();
            return Ok(Delivery::Rejected { status, body });
        }
        debug!(status = status.as_u16(), "webhook accepted message");
        Ok(Delivery::Accepted { status })
    }
}
