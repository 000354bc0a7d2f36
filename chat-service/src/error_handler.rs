//! Unified error handling for `chat-service`.
//!
//! This module exposes a single top-level error type [`ChatError`] for the whole
//! library, plus [`ConfigError`] for startup problems. Small helpers for reading
//! and validating environment variables return the unified [`Result<T>`] alias.
//!
//! All messages include the prefix `[Chat Service]` to simplify attribution in logs.

use thiserror::Error;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, ChatError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `chat-service` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ChatError {
    /// Configuration/validation errors (startup only).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Underlying HTTP transport error (e.g., `reqwest::Error`).
    #[error("[Chat Service] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),

    /// The chat API answered but rejected the call (`ok: false`).
    #[error("[Chat Service] api error: {error}")]
    Api {
        /// Error code reported by the API, e.g. `channel_not_found`.
        error: String,
    },

    /// The delivery queue is at capacity; the message was dropped.
    #[error("[Chat Service] delivery queue is full")]
    QueueFull,

    /// The delivery worker is gone; the message was dropped.
    #[error("[Chat Service] delivery queue is closed")]
    QueueClosed,
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/config-driven setup.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing or empty.
    #[error("[Chat Service] missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse (like timeouts or capacities).
    #[error("[Chat Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `HTTP_TIMEOUT_SECS`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u64`).
        reason: &'static str,
    },

    /// Value had the wrong format (e.g., invalid URL).
    #[error("[Chat Service] invalid format in {var}: {reason}")]
    InvalidFormat {
        /// Variable name (e.g., `CHAT_API_BASE`).
        var: &'static str,
        /// Explanation (e.g., `must start with http:// or https://`).
        reason: &'static str,
    },
}

/* ------------------------------------------------------------------------- */
/* Env helpers (return unified `Result<T>`)                                  */
/* ------------------------------------------------------------------------- */

/// Reads an optional, non-empty environment variable.
pub fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Parses an optional `u64` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ChatError::Config`] with [`ConfigError::InvalidNumber`] if the
/// variable is set but not a valid `u64`.
pub fn env_opt_u64(name: &'static str) -> Result<Option<u64>> {
    match env_opt(name) {
        Some(v) => v.trim().parse::<u64>().map(Some).map_err(|_| {
            ChatError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u64",
            })
        }),
        None => Ok(None),
    }
}

/* ------------------------------------------------------------------------- */
/* Validation helpers (return unified `Result<T>`)                           */
/* ------------------------------------------------------------------------- */

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// Returns [`ChatError::Config`] with [`ConfigError::InvalidFormat`] when
/// the string does not start with a valid HTTP scheme.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_scheme_is_checked() {
        assert!(validate_http_endpoint("CHAT_API_BASE", "https://slack.com/api").is_ok());
        assert!(validate_http_endpoint("CHAT_API_BASE", "http://localhost:9000").is_ok());

        let err = validate_http_endpoint("CHAT_API_BASE", "slack.com/api").unwrap_err();
        assert!(err.to_string().contains("CHAT_API_BASE"));
    }
}
