//! Crate-wide error types for mr-assigner.

use gitlab_client::GitLabError;
use thiserror::Error;

/// Convenient alias for assignment results.
pub type AssignResult<T> = Result<T, AssignError>;

/// Why a merge request could not be given a maintainer.
#[derive(Debug, Error)]
pub enum AssignError {
    /// Listing members or updating the merge request failed.
    #[error("transport error: {0}")]
    Transport(#[from] GitLabError),

    /// The project has nobody at maintainer level or above.
    #[error("no maintainers for project {project_id}, cannot assign a maintainer")]
    NoMaintainers { project_id: u64 },

    /// The current assignee's display name could not be resolved.
    #[error("failed to look up user {user_id}: {source}")]
    UserLookup {
        user_id: u64,
        #[source]
        source: GitLabError,
    },
}

/// Problems parsing the project → channels table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChannelTableError {
    /// An entry is not of the form `project=channel[,channel...]`.
    #[error("invalid channel table entry: {0:?}")]
    InvalidEntry(String),

    /// The project part of an entry is not a numeric id.
    #[error("invalid project id in channel table: {0:?}")]
    InvalidProjectId(String),

    /// A project was listed without any channel.
    #[error("no channels listed for project {0}")]
    EmptyChannels(u64),
}
