//! Thin Slack Web API client for posting bot messages.
//!
//! - `POST {api_base}/auth.test`: token check at worker startup
//! - `POST {api_base}/chat.postMessage`: one message to one channel
//!
//! Slack answers `200 OK` with `{"ok": false, "error": "..."}` for most
//! logical failures, so both the HTTP status and the `ok` flag are checked.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::ChatConfig;
use crate::error_handler::{ChatError, ConfigError, Result};
use crate::worker::MessageTransport;

/// Thin client for the Slack Web API.
#[derive(Debug, Clone)]
pub struct SlackService {
    client: reqwest::Client,
    token: String,
    url_post_message: String,
    url_auth_test: String,
}

impl SlackService {
    /// Creates a client from the chat configuration.
    ///
    /// # Errors
    /// - [`ConfigError::MissingVar`] if no token is configured
    /// - [`ChatError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: &ChatConfig) -> Result<Self> {
        let token = cfg
            .token
            .clone()
            .ok_or(ConfigError::MissingVar("CHAT_TOKEN"))?;

        let client = reqwest::Client::builder()
            .user_agent("mr-maintainer-bot/0.1")
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;

        let base = cfg.api_base.trim_end_matches('/');

        Ok(Self {
            client,
            token,
            url_post_message: format!("{base}/chat.postMessage"),
            url_auth_test: format!("{base}/auth.test"),
        })
    }

    /// Checks that the token is accepted; returns the bot user name.
    #[instrument(skip(self))]
    pub async fn auth_test(&self) -> Result<String> {
        let resp: SlackResponse = self
            .client
            .post(&self.url_auth_test)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let resp = resp.into_result()?;
        Ok(resp.user.unwrap_or_default())
    }

    /// Posts `text` to `channel`.
    #[instrument(skip(self, text))]
    pub async fn post_message(&self, channel: &str, text: &str) -> Result<()> {
        debug!(len = text.len(), "posting chat message");

        let resp: SlackResponse = self
            .client
            .post(&self.url_post_message)
            .bearer_auth(&self.token)
            .json(&PostMessage { channel, text })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        resp.into_result().map(|_| ())
    }
}

impl MessageTransport for SlackService {
    async fn send(&self, channel: &str, text: &str) -> Result<()> {
        self.post_message(channel, text).await
    }
}

#[derive(Debug, Serialize)]
struct PostMessage<'a> {
    channel: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SlackResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    user: Option<String>,
}

impl SlackResponse {
    fn into_result(self) -> Result<Self> {
        if self.ok {
            Ok(self)
        } else {
            Err(ChatError::Api {
                error: self.error.unwrap_or_else(|| "unknown_error".into()),
            })
        }
    }
}
