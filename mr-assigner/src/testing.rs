//! In-memory GitLab double shared by the unit tests of this crate.

use std::collections::HashMap;
use std::sync::Mutex;

use gitlab_client::{
    AccessLevel, GitLabError, GitLabResult, Member, ProviderError, SourceControl, User,
};

use crate::event::{Action, MergeRequestEvent};
use crate::picker::MaintainerPicker;

#[derive(Default)]
pub(crate) struct FakeGitLab {
    members: Vec<Option<Member>>,
    users: HashMap<u64, User>,
    pub fail_members: bool,
    pub fail_update: bool,
    pub fail_users: bool,
    updates: Mutex<Vec<(u64, u64, u64)>>,
    pages: Mutex<Vec<u32>>,
}

impl FakeGitLab {
    pub fn with_members(members: Vec<Member>) -> Self {
        Self::with_entries(members.into_iter().map(Some).collect())
    }

    pub fn with_entries(entries: Vec<Option<Member>>) -> Self {
        let users = entries
            .iter()
            .flatten()
            .map(|m| {
                (
                    m.user_id,
                    User {
                        id: m.user_id,
                        username: m.username.clone(),
                        name: m.display_name.clone(),
                    },
                )
            })
            .collect();
        Self {
            members: entries,
            users,
            ..Self::default()
        }
    }

    pub fn add_user(&mut self, id: u64, name: &str) {
        self.users.insert(
            id,
            User {
                id,
                username: name.to_lowercase(),
                name: name.to_string(),
            },
        );
    }

    pub fn updates(&self) -> Vec<(u64, u64, u64)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn pages_requested(&self) -> Vec<u32> {
        self.pages.lock().unwrap().clone()
    }
}

impl SourceControl for FakeGitLab {
    async fn get_user(&self, user_id: u64) -> GitLabResult<User> {
        if self.fail_users {
            return Err(ProviderError::Server(503).into());
        }
        self.users
            .get(&user_id)
            .cloned()
            .ok_or(GitLabError::Provider(ProviderError::NotFound))
    }

    async fn list_project_members(
        &self,
        _project_id: u64,
        page: u32,
        per_page: u32,
    ) -> GitLabResult<Vec<Option<Member>>> {
        self.pages.lock().unwrap().push(page);
        if self.fail_members {
            return Err(ProviderError::Timeout.into());
        }
        let per_page = per_page as usize;
        let start = (page.max(1) as usize - 1) * per_page;
        Ok(self
            .members
            .iter()
            .skip(start)
            .take(per_page)
            .cloned()
            .collect())
    }

    async fn update_merge_request_assignee(
        &self,
        project_id: u64,
        iid: u64,
        assignee_id: u64,
    ) -> GitLabResult<()> {
        if self.fail_update {
            return Err(ProviderError::Forbidden.into());
        }
        self.updates
            .lock()
            .unwrap()
            .push((project_id, iid, assignee_id));
        Ok(())
    }
}

/// Always picks the same index (clamped to the set size).
pub(crate) struct FixedPicker(pub usize);

impl MaintainerPicker for FixedPicker {
    fn pick(&self, len: usize) -> usize {
        self.0.min(len - 1)
    }
}

pub(crate) fn member(id: u64, name: &str, level: AccessLevel) -> Member {
    Member {
        user_id: id,
        username: name.to_lowercase(),
        display_name: name.to_string(),
        access_level: level,
    }
}

/// Project 42: Alice (maintainer), Bob (owner), Dave (developer).
pub(crate) fn project_42() -> FakeGitLab {
    FakeGitLab::with_members(vec![
        member(1, "Alice", AccessLevel::Maintainer),
        member(2, "Bob", AccessLevel::Owner),
        member(3, "Dave", AccessLevel::Developer),
    ])
}

pub(crate) fn event(action: &str, assignee_id: u64) -> MergeRequestEvent {
    MergeRequestEvent {
        project_id: 42,
        iid: 17,
        action: Action::from_wire(action),
        raw_action: action.to_string(),
        author_id: 3,
        assignee_id,
        url: "https://gitlab.example/team/widgets/-/merge_requests/17".into(),
        target_repo_name: "widgets".into(),
        is_work_in_progress: false,
    }
}
