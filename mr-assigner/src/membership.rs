//! Membership resolution: who may review merge requests in a project.

use std::collections::HashSet;

use gitlab_client::{GitLabResult, Member, ProviderError, SourceControl};
use tracing::{debug, warn};

/// Fixed page size for the members listing.
pub const MEMBERS_PAGE_SIZE: u32 = 100;

/// Upper bound on pages walked per listing (100 000 members).
pub const MAX_MEMBER_PAGES: u32 = 1000;

/// Lists direct project members with maintainer access or above.
///
/// Pages are walked from 1 until a page comes back shorter than
/// [`MEMBERS_PAGE_SIZE`]. The first failing page aborts the listing.
/// `null` entries are skipped with a warning, and a user appearing on two
/// pages is kept once. An empty result is not an error here. A listing that
/// is still returning full pages after [`MAX_MEMBER_PAGES`] is abandoned
/// with [`ProviderError::InvalidResponse`].
pub async fn list_maintainers<S>(client: &S, project_id: u64) -> GitLabResult<Vec<Member>>
where
    S: SourceControl,
{
    walk_member_pages(client, project_id, MAX_MEMBER_PAGES).await
}

async fn walk_member_pages<S>(
    client: &S,
    project_id: u64,
    max_pages: u32,
) -> GitLabResult<Vec<Member>>
where
    S: SourceControl,
{
    let mut maintainers = Vec::new();
    let mut seen = HashSet::new();
    let mut page = 1u32;

    loop {
        let entries = client
            .list_project_members(project_id, page, MEMBERS_PAGE_SIZE)
            .await?;
        let fetched = entries.len();

        for (index, entry) in entries.into_iter().enumerate() {
            let Some(member) = entry else {
                warn!(project_id, page, index, "null entry in members page, skipping");
                continue;
            };
            if member.access_level.can_maintain() && seen.insert(member.user_id) {
                maintainers.push(member);
            }
        }

        if fetched < MEMBERS_PAGE_SIZE as usize {
            break;
        }
        if page >= max_pages {
            warn!(project_id, max_pages, "members listing never ended, giving up");
            return Err(ProviderError::InvalidResponse(format!(
                "members of project {project_id} still paging after {max_pages} pages"
            ))
            .into());
        }
        page += 1;
    }

    debug!(
        project_id,
        pages = page,
        maintainers = maintainers.len(),
        "resolved project maintainers"
    );
    Ok(maintainers)
}

#[cfg(test)]
mod tests {
    use gitlab_client::{AccessLevel, GitLabError, ProviderError};

    use super::*;
    use crate::testing::{FakeGitLab, member, project_42};

    fn ids(members: &[Member]) -> Vec<u64> {
        members.iter().map(|m| m.user_id).collect()
    }

    #[tokio::test]
    async fn keeps_maintainers_and_owners_only() {
        let gitlab = project_42();
        let maintainers = list_maintainers(&gitlab, 42).await.unwrap();
        assert_eq!(ids(&maintainers), vec![1, 2]);
        assert_eq!(gitlab.pages_requested(), vec![1]);
    }

    #[tokio::test]
    async fn walks_every_page() {
        // 250 members over three pages; every tenth one is a maintainer.
        let members = (1..=250)
            .map(|id| {
                let level = if id % 10 == 0 {
                    AccessLevel::Maintainer
                } else {
                    AccessLevel::Developer
                };
                member(id, &format!("user{id}"), level)
            })
            .collect();
        let gitlab = FakeGitLab::with_members(members);

        let maintainers = list_maintainers(&gitlab, 42).await.unwrap();

        let expected: Vec<u64> = (1..=25).map(|n| n * 10).collect();
        assert_eq!(ids(&maintainers), expected);
        assert_eq!(gitlab.pages_requested(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn full_last_page_needs_one_more_request() {
        let members = (1..=200)
            .map(|id| member(id, "m", AccessLevel::Owner))
            .collect();
        let gitlab = FakeGitLab::with_members(members);

        let maintainers = list_maintainers(&gitlab, 42).await.unwrap();

        assert_eq!(maintainers.len(), 200);
        assert_eq!(gitlab.pages_requested(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn duplicates_across_pages_are_collapsed() {
        let mut members: Vec<Member> = (1..=100)
            .map(|id| member(id, "m", AccessLevel::Maintainer))
            .collect();
        members.push(member(100, "m", AccessLevel::Maintainer));
        members.push(member(101, "n", AccessLevel::Maintainer));
        let gitlab = FakeGitLab::with_members(members);

        let maintainers = list_maintainers(&gitlab, 42).await.unwrap();

        assert_eq!(maintainers.len(), 101);
        let unique: HashSet<u64> = ids(&maintainers).into_iter().collect();
        assert_eq!(unique.len(), 101);
    }

    #[tokio::test]
    async fn null_entry_does_not_truncate() {
        let gitlab = FakeGitLab::with_entries(vec![
            Some(member(1, "Alice", AccessLevel::Maintainer)),
            None,
            Some(member(2, "Bob", AccessLevel::Owner)),
        ]);

        let maintainers = list_maintainers(&gitlab, 42).await.unwrap();
        assert_eq!(ids(&maintainers), vec![1, 2]);
    }

    #[tokio::test]
    async fn no_maintainers_is_empty_not_error() {
        let gitlab = FakeGitLab::with_members(vec![member(3, "Dave", AccessLevel::Developer)]);
        assert!(list_maintainers(&gitlab, 7).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn endless_listing_is_cut_off() {
        let members = (1..=300)
            .map(|id| member(id, "m", AccessLevel::Maintainer))
            .collect();
        let gitlab = FakeGitLab::with_members(members);

        let err = walk_member_pages(&gitlab, 42, 2).await.unwrap_err();

        assert!(matches!(
            err,
            GitLabError::Provider(ProviderError::InvalidResponse(_))
        ));
        assert_eq!(gitlab.pages_requested(), vec![1, 2]);
    }

    #[tokio::test]
    async fn short_page_at_the_cap_still_succeeds() {
        let members = (1..=150)
            .map(|id| member(id, "m", AccessLevel::Maintainer))
            .collect();
        let gitlab = FakeGitLab::with_members(members);

        let maintainers = walk_member_pages(&gitlab, 42, 2).await.unwrap();
        assert_eq!(maintainers.len(), 150);
    }

    #[tokio::test]
    async fn page_failure_propagates() {
        let mut gitlab = project_42();
        gitlab.fail_members = true;

        let err = list_maintainers(&gitlab, 42).await.unwrap_err();
        assert!(matches!(
            err,
            GitLabError::Provider(ProviderError::Timeout)
        ));
    }
}
