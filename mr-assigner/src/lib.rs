//! Maintainer assignment for GitLab merge requests.
//!
//! 1) **Membership**: page through direct project members and keep those
//!    with maintainer access or above ([`membership`]).
//! 2) **Assignment**: keep a maintainer assignee, otherwise pick one at
//!    random and update the merge request ([`assign`]).
//! 3) **Routing**: decide per webhook action whether to assign, notify or
//!    do nothing ([`router`]).
//! 4) **Notification**: render the status line and fan it out to the
//!    project's chat channels ([`notify`]).
//!
//! Nothing is cached between events: every delivery re-resolves membership.

pub mod assign;
pub mod channels;
pub mod errors;
pub mod event;
pub mod membership;
pub mod notify;
pub mod picker;
pub mod router;

#[cfg(test)]
pub(crate) mod testing;

pub use assign::{AssignmentResult, ensure_assigned};
pub use channels::ChannelTable;
pub use errors::{AssignError, ChannelTableError};
pub use event::{Action, MergeRequestEvent, parse_merge_request_hook};
pub use membership::{MAX_MEMBER_PAGES, MEMBERS_PAGE_SIZE, list_maintainers};
pub use notify::{NotifyReport, UNKNOWN_AUTHOR, format_message, notify};
pub use picker::{MaintainerPicker, RandomPicker, SeededPicker};
pub use router::{DispatchOutcome, Dispatcher};
