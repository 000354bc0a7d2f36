use std::time::Duration;

use chat_service::{
    ChatConfig, ChatError,
    config::default_config::{DEFAULT_TIMEOUT_SECS, config_from_env},
    error_handler::env_opt,
};
use gitlab_client::{GitLabClient, GitLabConfig, GitLabError, SourceControl};
use mr_assigner::{ChannelTable, ChannelTableError, Dispatcher};
use thiserror::Error;

pub const DEFAULT_GITLAB_API_BASE: &str = "https://gitlab.com/api/v4";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Startup configuration problems. All of them are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("invalid number in {var}: {reason}")]
    InvalidNumber {
        var: &'static str,
        reason: &'static str,
    },

    #[error("invalid CHAT_CHANNELS: {0}")]
    Channels(#[from] ChannelTableError),

    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error(transparent)]
    GitLab(#[from] GitLabError),
}

/// Everything read from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address to bind, e.g. "0.0.0.0:8080".
    pub listen_addr: String,
    /// GitLab API base, token and outbound timeout.
    pub gitlab: GitLabConfig,
    /// Shared secret GitLab sends in `X-Gitlab-Token`; `None` disables the check.
    pub webhook_secret: Option<String>,
    /// Chat delivery settings (token optional).
    pub chat: ChatConfig,
    /// Project → chat channels.
    pub channels: ChannelTable,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// `HTTP_TIMEOUT_SECS` bounds both the GitLab and the chat client.
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = env_opt("GITLAB_TOKEN").ok_or(ConfigError::MissingEnv("GITLAB_TOKEN"))?;
        let timeout = http_timeout()?;

        let chat = config_from_env(timeout.as_secs())?;

        let channels = env_opt("CHAT_CHANNELS")
            .unwrap_or_default()
            .parse::<ChannelTable>()?;

        Ok(Self {
            listen_addr: env_opt("API_ADDRESS").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.into()),
            gitlab: GitLabConfig {
                base_api: env_opt("GITLAB_API_BASE")
                    .unwrap_or_else(|| DEFAULT_GITLAB_API_BASE.into()),
                token,
                timeout,
            },
            webhook_secret: env_opt("GITLAB_WEBHOOK_SECRET"),
            chat,
            channels,
        })
    }
}

fn http_timeout() -> Result<Duration, ConfigError> {
    let secs = match env_opt("HTTP_TIMEOUT_SECS") {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber {
                var: "HTTP_TIMEOUT_SECS",
                reason: "expected u64",
            })?,
        None => DEFAULT_TIMEOUT_SECS,
    };
    if secs == 0 {
        return Err(ConfigError::InvalidNumber {
            var: "HTTP_TIMEOUT_SECS",
            reason: "must be greater than zero",
        });
    }
    Ok(Duration::from_secs(secs))
}

/// Shared state for all HTTP handlers.
pub struct AppState<S = GitLabClient> {
    /// Routes merge request events; cloned into each background task.
    pub dispatcher: Dispatcher<S>,
    /// Expected `X-Gitlab-Token`, if any.
    pub webhook_secret: Option<String>,
    /// Whether chat delivery is active (reported by `/health`).
    pub chat_enabled: bool,
}

impl<S> AppState<S>
where
    S: SourceControl + 'static,
{
    pub fn new(
        dispatcher: Dispatcher<S>,
        webhook_secret: Option<String>,
        chat_enabled: bool,
    ) -> Self {
        Self {
            dispatcher,
            webhook_secret,
            chat_enabled,
        }
    }
}
