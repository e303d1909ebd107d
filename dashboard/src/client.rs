use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

use crate::types::StatusPayload;

/// Why a poll cycle produced nothing to render
#[derive(Debug, Error)]
pub enum PollError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend answered {0}")]
    Status(StatusCode),
    #[error("invalid status payload: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Stop,
}

impl BotCommand {
    pub fn path(&self) -> &'static str {
        match self {
            BotCommand::Start => "/api/bot/start",
            BotCommand::Stop => "/api/bot/stop",
        }
    }
}

impl fmt::Display for BotCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotCommand::Start => write!(f, "START"),
            BotCommand::Stop => write!(f, "STOP"),
        }
    }
}

/// HTTP client for the bot backend
#[derive(Clone)]
pub struct BotApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl BotApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("HTTP client"),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /api/status`, decoded and validated
    pub async fn fetch_status(&self) -> Result<StatusPayload, PollError> {
        let resp = self.client.get(self.url("/api/status")).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(PollError::Status(status));
        }
        let body = resp.bytes().await?;
        let payload = serde_json::from_slice(&body)?;
        debug!("Status payload decoded ({} bytes)", body.len());
        Ok(payload)
    }

    /// Fire-and-forget POST. The response body is ignored.
    pub async fn send_command(&self, command: BotCommand) -> Result<(), PollError> {
        let resp = self.client.post(self.url(command.path())).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(PollError::Status(status));
        }
        Ok(())
    }
}
