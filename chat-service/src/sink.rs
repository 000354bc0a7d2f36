//! Notification sink handed to request handlers.
//!
//! [`NotificationSink::Active`] enqueues onto the delivery worker;
//! [`NotificationSink::Disabled`] is used when no chat token is configured
//! and only logs.

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::ChatConfig;
use crate::error_handler::{ChatError, Result};
use crate::services::slack_service::SlackService;
use crate::worker;

/// One message for one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub channel: String,
    pub text: String,
}

/// Where notifications go.
#[derive(Debug, Clone)]
pub enum NotificationSink {
    /// Messages are queued for the background worker.
    Active(mpsc::Sender<ChatMessage>),
    /// Chat is not configured; messages are dropped.
    Disabled,
}

impl NotificationSink {
    pub fn is_enabled(&self) -> bool {
        matches!(self, NotificationSink::Active(_))
    }

    /// Enqueues a message without waiting.
    ///
    /// # Errors
    /// [`ChatError::QueueFull`] or [`ChatError::QueueClosed`] when the
    /// message could not be queued.
    pub fn deliver(&self, msg: ChatMessage) -> Result<()> {
        match self {
            NotificationSink::Active(tx) => tx.try_send(msg).map_err(|err| match err {
                TrySendError::Full(_) => ChatError::QueueFull,
                TrySendError::Closed(_) => ChatError::QueueClosed,
            }),
            NotificationSink::Disabled => {
                debug!(channel = %msg.channel, "chat disabled, message dropped");
                Ok(())
            }
        }
    }
}

/// Builds the sink for `cfg` and, when enabled, spawns the delivery worker.
///
/// Must be called from inside a Tokio runtime. The returned handle finishes
/// once every clone of the sink has been dropped.
///
/// # Errors
/// Fails only if the HTTP client cannot be built.
pub fn start(cfg: &ChatConfig) -> Result<(NotificationSink, Option<JoinHandle<()>>)> {
    if !cfg.is_enabled() {
        info!("CHAT_TOKEN not set, chat notifications disabled");
        return Ok((NotificationSink::Disabled, None));
    }

    let service = SlackService::new(cfg)?;
    let (tx, rx) = mpsc::channel(cfg.queue_capacity);

    let handle = tokio::spawn(async move {
        match service.auth_test().await {
            Ok(user) => info!(%user, "chat connection ready"),
            Err(err) => warn!(error = %err, "chat token check failed, deliveries may fail"),
        }
        worker::run(rx, service).await;
    });

    Ok((NotificationSink::Active(tx), Some(handle)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(channel: &str) -> ChatMessage {
        ChatMessage {
            channel: channel.into(),
            text: "hi".into(),
        }
    }

    #[test]
    fn disabled_sink_accepts_everything() {
        let sink = NotificationSink::Disabled;
        assert!(!sink.is_enabled());
        assert!(sink.deliver(msg("#any")).is_ok());
    }

    #[tokio::test]
    async fn active_sink_queues_without_blocking() {
        let (tx, mut rx) = mpsc::channel(1);
        let sink = NotificationSink::Active(tx);

        sink.deliver(msg("#one")).unwrap();
        assert!(matches!(sink.deliver(msg("#two")), Err(ChatError::QueueFull)));

        assert_eq!(rx.recv().await, Some(msg("#one")));
    }

    #[test]
    fn closed_queue_is_reported() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sink = NotificationSink::Active(tx);
        assert!(matches!(sink.deliver(msg("#x")), Err(ChatError::QueueClosed)));
    }

    #[tokio::test]
    async fn start_without_token_is_disabled() {
        let (sink, handle) = start(&ChatConfig::default()).unwrap();
        assert!(!sink.is_enabled());
        assert!(handle.is_none());
    }
}
