//! Background delivery worker.
//!
//! One task owns the chat client and drains the queue, so sends are
//! serialized and never run on a request path.

use std::future::Future;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error_handler::Result;
use crate::sink::ChatMessage;

/// Anything that can post a text message to a channel.
pub trait MessageTransport: Send + Sync + 'static {
    fn send(&self, channel: &str, text: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Counters reported when the worker stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryStats {
    pub delivered: usize,
    pub failed: usize,
}

/// Drains `rx` until every sender is dropped.
///
/// A failed send is logged and counted; it never stops the loop.
pub async fn run<T: MessageTransport>(
    mut rx: mpsc::Receiver<ChatMessage>,
    transport: T,
) -> DeliveryStats {
    let mut stats = DeliveryStats::default();

    while let Some(msg) = rx.recv().await {
        match transport.send(&msg.channel, &msg.text).await {
            Ok(()) => {
                stats.delivered += 1;
                debug!(channel = %msg.channel, "chat message delivered");
            }
            Err(err) => {
                stats.failed += 1;
                warn!(channel = %msg.channel, error = %err, "chat delivery failed");
            }
        }
    }

    info!(
        delivered = stats.delivered,
        failed = stats.failed,
        "chat delivery worker stopped"
    );
    stats
}
