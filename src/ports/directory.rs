//! Membership directory port used by the access policy.

use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// A team with access to a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Members endpoint, possibly carrying a `{/member}` URI template suffix.
    pub members_url: String,
}

/// Read-only lookups against the organisation directory.
///
/// Every method is fatal on failure: a broken lookup must not be mistaken
/// for "nobody is a member".
pub trait MembershipDirectory {
    /// Teams associated with `repo` (`"org/repo"`), in directory order.
    ///
    /// # Errors
    ///
    /// Returns a [`LookupError`] on any non-success response.
    fn repo_teams(&self, repo: &str) -> Result<Vec<Team>, LookupError>;

    /// Logins of the members of `team`.
    ///
    /// # Errors
    ///
    /// Returns a [`LookupError`] on any non-success response.
    fn team_members(&self, repo: &str, team: &Team) -> Result<Vec<String>, LookupError>;

    /// Logins of the members of `org`.
    ///
    /// # Errors
    ///
    /// Returns a [`LookupError`] on any non-success response.
    fn org_members(&self, org: &str) -> Result<Vec<String>, LookupError>;
}
