//! Event router: one webhook delivery, one transition evaluation.
//!
//! | action              | behavior                          |
//! |---------------------|-----------------------------------|
//! | open, reopen        | ensure assigned, then notify      |
//! | any other known one | no-op (reserved extension points) |
//! | unknown             | warn, no-op                       |
//!
//! A failed assignment is logged and suppresses the notification.

use std::sync::Arc;

use chat_service::NotificationSink;
use gitlab_client::SourceControl;
use tracing::{debug, error, instrument, warn};

use crate::assign::ensure_assigned;
use crate::channels::ChannelTable;
use crate::errors::AssignError;
use crate::event::{Action, MergeRequestEvent};
use crate::notify::{NotifyReport, notify};
use crate::picker::MaintainerPicker;

/// Result of routing one event.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// A maintainer holds the merge request and the notifier ran.
    Assigned {
        assignee: String,
        changed: bool,
        notified: NotifyReport,
    },
    /// A known action with no behavior attached.
    Ignored(Action),
    /// An action string this bot does not know.
    Unrecognized(String),
    /// Assignment failed; nothing was announced.
    Failed(AssignError),
}

/// Everything needed to handle events, shared across request tasks.
pub struct Dispatcher<S> {
    client: Arc<S>,
    picker: Arc<dyn MaintainerPicker>,
    sink: NotificationSink,
    channels: Arc<ChannelTable>,
}

impl<S> Clone for Dispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            picker: Arc::clone(&self.picker),
            sink: self.sink.clone(),
            channels: Arc::clone(&self.channels),
        }
    }
}

impl<S> Dispatcher<S>
where
    S: SourceControl + 'static,
{
    pub fn new(
        client: Arc<S>,
        picker: Arc<dyn MaintainerPicker>,
        sink: NotificationSink,
        channels: Arc<ChannelTable>,
    ) -> Self {
        Self {
            client,
            picker,
            sink,
            channels,
        }
    }

    /// Routes `event` by its action.
    #[instrument(
        name = "dispatch",
        skip_all,
        fields(project = event.project_id, iid = event.iid, action = %event.raw_action)
    )]
    pub async fn dispatch(&self, event: &MergeRequestEvent) -> DispatchOutcome {
        let action = match event.action {
            Some(action) => action,
            None => {
                warn!(raw = %event.raw_action, "unrecognized merge request action, ignoring");
                return DispatchOutcome::Unrecognized(event.raw_action.clone());
            }
        };

        if !action.triggers_assignment() {
            match action.reserved_for() {
                Some(planned) => debug!(?action, planned, "no behavior for action yet"),
                None => debug!(?action, "nothing to do for action"),
            }
            return DispatchOutcome::Ignored(action);
        }

        let assignment = match ensure_assigned(self.client.as_ref(), self.picker.as_ref(), event).await {
            Ok(assignment) => assignment,
            Err(err) => {
                error!(
                    project_id = event.project_id,
                    iid = event.iid,
                    error = %err,
                    "failed to assign maintainer to merge request"
                );
                return DispatchOutcome::Failed(err);
            }
        };

        let destinations = self.channels.channels_for(event.project_id);
        let notified = notify(
            self.client.as_ref(),
            &self.sink,
            event,
            &assignment.assignee_name,
            destinations,
        )
        .await;

        DispatchOutcome::Assigned {
            assignee: assignment.assignee_name,
            changed: assignment.changed,
            notified,
        }
    }
}
