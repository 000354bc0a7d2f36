//! Data model for the subset of GitLab resources the bot touches.

use serde::Deserialize;

/// Project access tier, ordered from least to most privileged.
///
/// GitLab reports these as integers (`10` guest .. `50` owner). Values
/// below guest (`0` no access, `5` minimal access) collapse into
/// [`AccessLevel::NoAccess`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(from = "u32")]
pub enum AccessLevel {
    NoAccess,
    Guest,
    Reporter,
    Developer,
    Maintainer,
    Owner,
}

impl AccessLevel {
    /// True for maintainer-level access or above.
    pub fn can_maintain(self) -> bool {
        self >= AccessLevel::Maintainer
    }
}

impl From<u32> for AccessLevel {
    /// Picks the highest tier whose threshold `level` reaches.
    fn from(level: u32) -> Self {
        match level {
            50..=u32::MAX => AccessLevel::Owner,
            40..=49 => AccessLevel::Maintainer,
            30..=39 => AccessLevel::Developer,
            20..=29 => AccessLevel::Reporter,
            10..=19 => AccessLevel::Guest,
            _ => AccessLevel::NoAccess,
        }
    }
}

/// A direct member of a project.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Member {
    #[serde(rename = "id")]
    pub user_id: u64,
    #[serde(default)]
    pub username: String,
    #[serde(rename = "name", default)]
    pub display_name: String,
    pub access_level: AccessLevel,
}

/// A GitLab user as returned by `GET /users/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub username: String,
    pub name: String,
}
