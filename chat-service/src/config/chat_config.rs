/// Configuration for chat delivery.
///
/// # Fields
///
/// - `token`: bot token; `None` disables delivery entirely.
/// - `api_base`: Web API base URL (e.g., `https://slack.com/api`).
/// - `timeout_secs`: request timeout for every outbound call.
/// - `queue_capacity`: bound of the in-process delivery queue.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Optional bot token. Absent means chat is disabled.
    pub token: Option<String>,

    /// Web API base URL without trailing slash.
    pub api_base: String,

    /// Request timeout (in seconds).
    pub timeout_secs: u64,

    /// Maximum number of messages waiting for delivery.
    pub queue_capacity: usize,
}

impl ChatConfig {
    /// True when a token is configured.
    pub fn is_enabled(&self) -> bool {
        self.token.is_some()
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: super::default_config::DEFAULT_CHAT_API_BASE.to_string(),
            timeout_secs: super::default_config::DEFAULT_TIMEOUT_SECS,
            queue_capacity: super::default_config::DEFAULT_QUEUE_CAPACITY,
        }
    }
}
