//! Chat configuration loaded from environment variables.
//!
//! # Environment variables
//!
//! - `CHAT_TOKEN`          = bot token (optional; absent disables chat)
//! - `CHAT_API_BASE`       = Web API base (default `https://slack.com/api`)
//! - `CHAT_QUEUE_CAPACITY` = delivery queue bound (default `256`)

use crate::{
    config::chat_config::ChatConfig,
    error_handler::{ConfigError, Result, env_opt, env_opt_u64, validate_http_endpoint},
};

pub const DEFAULT_CHAT_API_BASE: &str = "https://slack.com/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Builds a [`ChatConfig`] from the process environment.
///
/// `timeout_secs` is the process-wide outbound timeout, parsed by the caller.
///
/// # Errors
///
/// - [`ConfigError::InvalidFormat`] if `CHAT_API_BASE` is not an http(s) URL
/// - [`ConfigError::InvalidNumber`] if `CHAT_QUEUE_CAPACITY` does not parse or is zero
pub fn config_from_env(timeout_secs: u64) -> Result<ChatConfig> {
    let token = env_opt("CHAT_TOKEN");

    let api_base = env_opt("CHAT_API_BASE").unwrap_or_else(|| DEFAULT_CHAT_API_BASE.into());
    validate_http_endpoint("CHAT_API_BASE", &api_base)?;

    let queue_capacity = match env_opt_u64("CHAT_QUEUE_CAPACITY")? {
        Some(0) => {
            return Err(ConfigError::InvalidNumber {
                var: "CHAT_QUEUE_CAPACITY",
                reason: "must be greater than zero",
            }
            .into());
        }
        Some(n) => usize::try_from(n).map_err(|_| ConfigError::InvalidNumber {
            var: "CHAT_QUEUE_CAPACITY",
            reason: "does not fit in usize",
        })?,
        None => DEFAULT_QUEUE_CAPACITY,
    };

    Ok(ChatConfig {
        token,
        api_base: api_base.trim_end_matches('/').to_string(),
        timeout_secs,
        queue_capacity,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error_handler::ChatError;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const VARS: [&str; 3] = ["CHAT_TOKEN", "CHAT_API_BASE", "CHAT_QUEUE_CAPACITY"];

    /// Runs `f` with exactly `vars` set among the chat variables.
    fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());
        // SAFETY: every test touching these variables holds ENV_LOCK.
        unsafe {
            for name in VARS {
                std::env::remove_var(name);
            }
            for (name, value) in vars {
                std::env::set_var(name, value);
            }
        }
        f()
    }

    #[test]
    fn missing_token_disables_chat() {
        let cfg = with_env(&[], || config_from_env(7)).unwrap();

        assert!(!cfg.is_enabled());
        assert_eq!(cfg.api_base, DEFAULT_CHAT_API_BASE);
        assert_eq!(cfg.timeout_secs, 7);
        assert_eq!(cfg.queue_capacity, DEFAULT_QUEUE_CAPACITY);
    }

    #[test]
    fn explicit_values_are_used() {
        let cfg = with_env(
            &[
                ("CHAT_TOKEN", "xoxb-1"),
                ("CHAT_API_BASE", "http://localhost:9000/api/"),
                ("CHAT_QUEUE_CAPACITY", "16"),
            ],
            || config_from_env(DEFAULT_TIMEOUT_SECS),
        )
        .unwrap();

        assert!(cfg.is_enabled());
        assert_eq!(cfg.api_base, "http://localhost:9000/api");
        assert_eq!(cfg.queue_capacity, 16);
    }

    #[test]
    fn bad_queue_capacity_is_rejected() {
        for raw in ["0", "lots"] {
            let err = with_env(&[("CHAT_QUEUE_CAPACITY", raw)], || config_from_env(10)).unwrap_err();
            assert!(
                matches!(
                    err,
                    ChatError::Config(ConfigError::InvalidNumber {
                        var: "CHAT_QUEUE_CAPACITY",
                        ..
                    })
                ),
                "{raw}: {err}"
            );
        }
    }

    #[test]
    fn api_base_needs_scheme() {
        let err = with_env(&[("CHAT_API_BASE", "slack.com/api")], || config_from_env(10)).unwrap_err();
        assert!(matches!(
            err,
            ChatError::Config(ConfigError::InvalidFormat { var: "CHAT_API_BASE", .. })
        ));
    }
}
