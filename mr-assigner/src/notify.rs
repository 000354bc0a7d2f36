//! Notifier: tell chat channels who got the merge request.

use chat_service::{ChatMessage, NotificationSink};
use gitlab_client::SourceControl;
use tracing::{info, warn};

use crate::event::MergeRequestEvent;

/// Stand-in when the author's name cannot be resolved.
pub const UNKNOWN_AUTHOR: &str = "<unknown author>";

/// What happened to each destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifyReport {
    pub queued: usize,
    pub failed: usize,
}

/// Renders the status line for an assigned merge request.
pub fn format_message(event: &MergeRequestEvent, author: &str, assignee: &str) -> String {
    let wip = if event.is_work_in_progress { "WIP " } else { "" };
    format!(
        "New {wip}merge request in {} from {author} has been assigned to {assignee}.  See {} for details.",
        event.target_repo_name, event.url
    )
}

/// Resolves the author, renders the message and hands one copy per
/// destination to `sink`.
///
/// An unresolvable author falls back to [`UNKNOWN_AUTHOR`]. A destination
/// that cannot be queued is logged and skipped; the others still go out.
pub async fn notify<S>(
    client: &S,
    sink: &NotificationSink,
    event: &MergeRequestEvent,
    assignee_name: &str,
    destinations: &[String],
) -> NotifyReport
where
    S: SourceControl,
{
    let author = match client.get_user(event.author_id).await {
        Ok(user) => user.name,
        Err(err) => {
            warn!(
                project_id = event.project_id,
                iid = event.iid,
                author_id = event.author_id,
                error = %err,
                "failed to resolve merge request author"
            );
            UNKNOWN_AUTHOR.to_string()
        }
    };

    let text = format_message(event, &author, assignee_name);
    info!("{}", text);

    let mut report = NotifyReport::default();
    for channel in destinations {
        let msg = ChatMessage {
            channel: channel.clone(),
            text: text.clone(),
        };
        match sink.deliver(msg) {
            Ok(()) => report.queued += 1,
            Err(err) => {
                report.failed += 1;
                warn!(%channel, error = %err, "failed to queue chat notification");
            }
        }
    }

    report
}
