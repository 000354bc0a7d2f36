//! Assignment engine: make sure a merge request sits with a maintainer.
//!
//! Policy:
//! 1. Resolve the maintainer set; an empty set is an error.
//! 2. Pick one maintainer at random as the candidate.
//! 3. Unassigned → assign the candidate.
//! 4. Assigned to a maintainer → keep it, no API mutation.
//! 5. Assigned to anyone else → reassign to the candidate.
//!
//! Concurrent deliveries for the same MR may each pick a different
//! candidate; the next event sees a maintainer assignee and settles.

use gitlab_client::SourceControl;
use tracing::{debug, info};

use crate::errors::{AssignError, AssignResult};
use crate::event::MergeRequestEvent;
use crate::membership::list_maintainers;
use crate::picker::MaintainerPicker;

/// Outcome of [`ensure_assigned`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentResult {
    pub assignee_id: u64,
    pub assignee_name: String,
    /// True when an update call was issued.
    pub changed: bool,
}

/// Ensures `event`'s merge request is assigned to a project maintainer.
///
/// Returns the name of whoever holds the merge request afterwards.
pub async fn ensure_assigned<S, P>(
    client: &S,
    picker: &P,
    event: &MergeRequestEvent,
) -> AssignResult<AssignmentResult>
where
    S: SourceControl,
    P: MaintainerPicker + ?Sized,
{
    let maintainers = list_maintainers(client, event.project_id).await?;
    if maintainers.is_empty() {
        return Err(AssignError::NoMaintainers {
            project_id: event.project_id,
        });
    }

    let candidate = &maintainers[picker.pick(maintainers.len()) % maintainers.len()];

    if !event.is_unassigned() {
        if let Some(current) = maintainers.iter().find(|m| m.user_id == event.assignee_id) {
            debug!(
                project_id = event.project_id,
                iid = event.iid,
                assignee_id = current.user_id,
                "current assignee is a maintainer, keeping it"
            );

            let assignee_name = if current.display_name.trim().is_empty() {
                client
                    .get_user(current.user_id)
                    .await
                    .map_err(|source| AssignError::UserLookup {
                        user_id: current.user_id,
                        source,
                    })?
                    .name
            } else {
                current.display_name.clone()
            };

            return Ok(AssignmentResult {
                assignee_id: current.user_id,
                assignee_name,
                changed: false,
            });
        }

        info!(
            project_id = event.project_id,
            iid = event.iid,
            previous = event.assignee_id,
            "assignee is not a maintainer, reassigning"
        );
    }

    client
        .update_merge_request_assignee(event.project_id, event.iid, candidate.user_id)
        .await?;

    info!(
        project_id = event.project_id,
        iid = event.iid,
        assignee_id = candidate.user_id,
        assignee = %candidate.display_name,
        "assigned maintainer"
    );

    Ok(AssignmentResult {
        assignee_id: candidate.user_id,
        assignee_name: candidate.display_name.clone(),
        changed: true,
    })
}
