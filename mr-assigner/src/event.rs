//! Merge request webhook payload and the event snapshot built from it.

use serde::Deserialize;

/// Lifecycle action carried by a merge request webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Opened,
    Reopened,
    Updated,
    Approved,
    Unapproved,
    Merged,
    Closed,
}

impl Action {
    /// Parses the `object_attributes.action` wire value.
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw.trim() {
            "open" => Some(Action::Opened),
            "reopen" => Some(Action::Reopened),
            "update" => Some(Action::Updated),
            "approved" | "approval" => Some(Action::Approved),
            "unapproved" | "unapproval" => Some(Action::Unapproved),
            "merge" => Some(Action::Merged),
            "close" => Some(Action::Closed),
            _ => None,
        }
    }

    /// Opened and reopened merge requests need a maintainer.
    pub fn triggers_assignment(self) -> bool {
        matches!(self, Action::Opened | Action::Reopened)
    }

    /// Behavior planned for actions that are currently no-ops.
    pub fn reserved_for(self) -> Option<&'static str> {
        match self {
            Action::Opened | Action::Reopened => None,
            Action::Updated => Some("work-in-progress change notification, extra reviewer tagging"),
            Action::Approved | Action::Unapproved => Some("approval-count enforcement"),
            Action::Merged | Action::Closed => None,
        }
    }
}

/// Immutable snapshot of one merge request webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequestEvent {
    pub project_id: u64,
    pub iid: u64,
    /// `None` when the wire value is not a known action.
    pub action: Option<Action>,
    pub raw_action: String,
    pub author_id: u64,
    /// `0` means unassigned.
    pub assignee_id: u64,
    pub url: String,
    pub target_repo_name: String,
    pub is_work_in_progress: bool,
}

impl MergeRequestEvent {
    pub fn is_unassigned(&self) -> bool {
        self.assignee_id == 0
    }
}

/// "Merge Request Hook" body (subset).
#[derive(Debug, Deserialize)]
pub struct MergeRequestHook {
    pub project: HookProject,
    pub object_attributes: HookAttributes,
}

#[derive(Debug, Deserialize)]
pub struct HookProject {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HookAttributes {
    pub iid: u64,
    #[serde(default)]
    pub action: Option<String>,
    pub author_id: u64,
    #[serde(default)]
    pub assignee_id: Option<u64>,
    #[serde(default)]
    pub assignee_ids: Vec<u64>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub work_in_progress: bool,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub target: Option<HookTarget>,
}

#[derive(Debug, Deserialize)]
pub struct HookTarget {
    pub name: String,
}

impl From<MergeRequestHook> for MergeRequestEvent {
    fn from(hook: MergeRequestHook) -> Self {
        let attrs = hook.object_attributes;
        let raw_action = attrs.action.unwrap_or_default();

        let assignee_id = attrs
            .assignee_id
            .or_else(|| attrs.assignee_ids.first().copied())
            .unwrap_or(0);

        let target_repo_name = attrs
            .target
            .map(|t| t.name)
            .or(hook.project.name)
            .unwrap_or_default();

        Self {
            project_id: hook.project.id,
            iid: attrs.iid,
            action: Action::from_wire(&raw_action),
            raw_action,
            author_id: attrs.author_id,
            assignee_id,
            url: attrs.url,
            target_repo_name,
            is_work_in_progress: attrs.work_in_progress || attrs.draft,
        }
    }
}

/// Parses a webhook body into an event.
///
/// # Errors
/// Any JSON error (missing `project.id`, `iid`, `author_id`, wrong types).
pub fn parse_merge_request_hook(body: &[u8]) -> Result<MergeRequestEvent, serde_json::Error> {
    let hook: MergeRequestHook = serde_json::from_slice(body)?;
    Ok(hook.into())
}
