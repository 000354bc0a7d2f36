//! Crate-wide error hierarchy for gitlab-client.

use reqwest::StatusCode;
use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type GitLabResult<T> = Result<T, GitLabError>;

/// Root error type for the gitlab-client crate.
#[derive(Debug, Error)]
pub enum GitLabError {
    /// Any failure talking to the GitLab API (network or non-2xx status).
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Client construction problems (missing token, bad base URL).
    #[error(transparent)]
    Config(#[from] ClientConfigError),
}

/// Transport-level failure of a single GitLab API call.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Unauthorized (HTTP 401).
    #[error("unauthorized")]
    Unauthorized,

    /// Forbidden (HTTP 403).
    #[error("forbidden")]
    Forbidden,

    /// Not found (HTTP 404).
    #[error("not found")]
    NotFound,

    /// Rate limited (HTTP 429).
    #[error("rate limited")]
    RateLimited {
        /// Optional `Retry-After` hint in seconds when available.
        retry_after_secs: Option<u64>,
    },

    /// Gateway / server error (HTTP 5xx).
    #[error("server error: status {0}")]
    Server(u16),

    /// Other HTTP status (non-2xx) not covered by specific variants.
    #[error("http status error: status {0}")]
    HttpStatus(u16),

    /// Timeout at transport level.
    #[error("timeout")]
    Timeout,

    /// Network/transport failure without HTTP status (DNS/connect/reset).
    #[error("network error: {0}")]
    Network(String),

    /// Unexpected/invalid shape of the response body.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

/// Configuration and setup errors.
#[derive(Debug, Error)]
pub enum ClientConfigError {
    /// Missing required access token.
    #[error("missing gitlab token")]
    MissingToken,

    /// Invalid base API URL.
    #[error("invalid base api url: {0}")]
    InvalidBaseUrl(String),
}

impl ProviderError {
    /// Maps a non-success HTTP status to a provider error.
    pub fn from_status(status: StatusCode, retry_after_secs: Option<u64>) -> Self {
        let code = status.as_u16();
        match code {
            401 => ProviderError::Unauthorized,
            403 => ProviderError::Forbidden,
            404 => ProviderError::NotFound,
            429 => ProviderError::RateLimited { retry_after_secs },
            500..=599 => ProviderError::Server(code),
            _ => ProviderError::HttpStatus(code),
        }
    }
}

impl From<reqwest::Error> for GitLabError {
    fn from(e: reqwest::Error) -> Self {
        GitLabError::Provider(ProviderError::from(e))
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return ProviderError::Timeout;
        }

        if let Some(status) = e.status() {
            return ProviderError::from_status(status, None);
        }

        if e.is_decode() {
            return ProviderError::InvalidResponse(e.to_string());
        }

        ProviderError::Network(e.to_string())
    }
}
