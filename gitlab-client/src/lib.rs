//! Thin GitLab REST client used by the maintainer bot.
//!
//! Only three calls are needed: look up a user, list one page of direct
//! project members, and set a merge request's assignee. They are exposed
//! both as inherent methods on [`GitLabClient`] and through the
//! [`SourceControl`] trait so the assignment logic can run against an
//! in-memory double in tests.

pub mod errors;
pub mod gitlab;
pub mod types;

use std::future::Future;

pub use errors::{ClientConfigError, GitLabError, GitLabResult, ProviderError};
pub use gitlab::{GitLabClient, GitLabConfig};
pub use types::{AccessLevel, Member, User};

/// Source-control operations the bot depends on.
///
/// Futures are `Send` so callers can drive them from `tokio::spawn`.
pub trait SourceControl: Send + Sync {
    /// Fetches a user by id.
    fn get_user(&self, user_id: u64) -> impl Future<Output = GitLabResult<User>> + Send;

    /// Fetches one page (1-based) of direct project members.
    fn list_project_members(
        &self,
        project_id: u64,
        page: u32,
        per_page: u32,
    ) -> impl Future<Output = GitLabResult<Vec<Option<Member>>>> + Send;

    /// Sets the assignee of merge request `iid` in `project_id`.
    fn update_merge_request_assignee(
        &self,
        project_id: u64,
        iid: u64,
        assignee_id: u64,
    ) -> impl Future<Output = GitLabResult<()>> + Send;
}
