//! Who may have their issues mirrored.
//!
//! The mode is chosen by configuration (`ONLY_REACT_TO`). Anything
//! unrecognised denies. Directory failures are returned as errors rather
//! than denials so a broken lookup is never mistaken for "not a member".

use crate::error::LookupError;
use crate::ports::directory::MembershipDirectory;

/// `ONLY_REACT_TO` value for [`PolicyMode::AllowAll`].
pub const FLAG_ONLY_REACT_TO_ALL: &str = "all";
/// `ONLY_REACT_TO` value for [`PolicyMode::AllowListedUsers`].
pub const FLAG_ONLY_REACT_TO_LISTED_USERS: &str = "listed-users";
/// `ONLY_REACT_TO` value for [`PolicyMode::AllowRepoTeamMembers`].
pub const FLAG_ONLY_REACT_TO_REPO_TEAM: &str = "repo-team";
/// `ONLY_REACT_TO` value for [`PolicyMode::AllowRepoOrgMembers`].
pub const FLAG_ONLY_REACT_TO_REPO_ORG: &str = "repo-org";

/// Access policy modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyMode {
    /// Every actor may bridge.
    AllowAll,
    /// Only the listed logins may bridge.
    AllowListedUsers(Vec<String>),
    /// Members of any team attached to the repository may bridge.
    AllowRepoTeamMembers,
    /// Members of the organisation owning the repository may bridge.
    AllowRepoOrgMembers,
    /// Unknown setting; nobody may bridge.
    Unrecognized(String),
}

impl PolicyMode {
    /// Interprets the `ONLY_REACT_TO` flag.
    ///
    /// `allowed_users` is a comma-separated login list, read only for
    /// `listed-users`.
    #[must_use]
    pub fn from_setting(flag: &str, allowed_users: Option<&str>) -> Self {
        match flag.trim() {
            FLAG_ONLY_REACT_TO_ALL => Self::AllowAll,
            FLAG_ONLY_REACT_TO_LISTED_USERS => Self::AllowListedUsers(
                allowed_users
                    .unwrap_or_default()
                    .split(',')
                    .map(str::trim)
                    .filter(|login| !login.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            FLAG_ONLY_REACT_TO_REPO_TEAM => Self::AllowRepoTeamMembers,
            FLAG_ONLY_REACT_TO_REPO_ORG => Self::AllowRepoOrgMembers,
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

/// Evaluates a [`PolicyMode`] for one actor.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    mode: PolicyMode,
}

impl AccessPolicy {
    /// Creates an evaluator for `mode`.
    #[must_use]
    pub fn new(mode: PolicyMode) -> Self {
        Self { mode }
    }

    /// Whether `actor` may mirror an issue opened on `repo` (`"org/repo"`).
    ///
    /// # Errors
    ///
    /// Returns the [`LookupError`] of the first directory lookup that fails.
    /// Team lookups stop at the first team containing `actor`.
    pub fn may_bridge(
        &self,
        actor: &str,
        repo: &str,
        directory: &dyn MembershipDirectory,
    ) -> Result<bool, LookupError> {
        match &self.mode {
            PolicyMode::AllowAll => {
                tracing::info!("All Issues are being bridged to Asana.");
                Ok(true)
            }
            PolicyMode::AllowListedUsers(logins) => {
                if logins.iter().any(|login| login == actor) {
                    tracing::info!("Issue actor {actor} is on the list of allowed users.");
                    Ok(true)
                } else {
                    deny()
                }
            }
            PolicyMode::AllowRepoTeamMembers => {
                for team in directory.repo_teams(repo).inspect_err(log_lookup_failure)? {
                    let members = directory.team_members(repo, &team).inspect_err(log_lookup_failure)?;
                    if members.iter().any(|login| login == actor) {
                        tracing::info!("Issue actor {actor} is on a team associated with the repo.");
                        return Ok(true);
                    }
                }
                deny()
            }
            PolicyMode::AllowRepoOrgMembers => {
                let org = repo.split('/').next().unwrap_or(repo);
                let members = directory.org_members(org).inspect_err(log_lookup_failure)?;
                if members.iter().any(|login| login == actor) {
                    tracing::info!("Issue actor {actor} is part of the {org} org that owns this repo.");
                    Ok(true)
                } else {
                    deny()
                }
            }
            PolicyMode::Unrecognized(flag) => {
                tracing::warn!(only_react_to = %flag, "Unrecognised policy mode; bridging is not allowed");
                Ok(false)
            }
        }
    }
}

fn deny() -> Result<bool, LookupError> {
    tracing::info!("Bridging this issue to Asana is not allowed");
    Ok(false)
}

fn log_lookup_failure(err: &LookupError) {
    tracing::error!("{err}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::replaying::ReplayingHttpTransport;
    use crate::cassette::format::Cassette;
    use crate::config::GithubConfig;
    use crate::github::GithubClient;

    const TEAMS: &str = r#"[
        {"id": 1, "node_id": "TESTVGVhbTE=", "members_url": "https://api.github.com/orgs/test/teams/team-one/members{/member}"},
        {"id": 99, "node_id": "TESTTWOhbTE=", "members_url": "https://api.github.com/orgs/test/teams/team-99/members{/member}"}
    ]"#;
    const TEAM_ONE: &str = r#"[{"login": "alice-mctest", "id": 1}, {"login": "bob-mctest", "id": 2}]"#;
    const TEAM_99: &str = r#"[{"login": "eve-mctest", "id": 33}, {"login": "alexander-testington", "id": 99}]"#;
    const ORG: &str = r#"[
        {"login": "professor-falken", "id": 1},
        {"login": "alexander-testington", "id": 34532454},
        {"login": "david-lightman", "id": 123131}
    ]"#;

    fn transport(responses: &[(u16, &str)]) -> ReplayingHttpTransport {
        let mut cassette = Cassette::new("policy", "test");
        for (status, body) in responses {
            cassette.push_http_response(*status, *body);
        }
        ReplayingHttpTransport::from_cassette(&cassette)
    }

    fn evaluate(
        mode: PolicyMode,
        actor: &str,
        responses: &[(u16, &str)],
    ) -> (Result<bool, LookupError>, Vec<String>) {
        let http = transport(responses);
        let config = GithubConfig::new(Some("test-token-for-github".into()));
        let github = GithubClient::new(&http, &config);
        let result = AccessPolicy::new(mode).may_bridge(actor, "example/luftballons", &github);
        (result, http.requests().into_iter().map(|r| r.url).collect())
    }

    #[test]
    fn parses_flags() {
        assert_eq!(PolicyMode::from_setting("all", None), PolicyMode::AllowAll);
        assert_eq!(PolicyMode::from_setting(" repo-team ", None), PolicyMode::AllowRepoTeamMembers);
        assert_eq!(PolicyMode::from_setting("repo-org", None), PolicyMode::AllowRepoOrgMembers);
        assert_eq!(
            PolicyMode::from_setting("listed-users", Some("alice, bob,,")),
            PolicyMode::AllowListedUsers(vec!["alice".into(), "bob".into()])
        );
        assert_eq!(
            PolicyMode::from_setting("not-a-recognised-value", None),
            PolicyMode::Unrecognized("not-a-recognised-value".into())
        );
    }

    #[test]
    fn allow_all_makes_no_lookups() {
        let (result, urls) = evaluate(PolicyMode::AllowAll, "x", &[]);
        assert!(result.unwrap());
        assert!(urls.is_empty());
    }

    #[test]
    fn listed_users() {
        let mode = PolicyMode::from_setting("listed-users", Some("alice,bob"));
        assert!(evaluate(mode.clone(), "alice", &[]).0.unwrap());
        assert!(!evaluate(mode, "carol", &[]).0.unwrap());
    }

    #[test]
    fn empty_allowlist_denies_everyone() {
        let mode = PolicyMode::from_setting("listed-users", None);
        assert!(!evaluate(mode, "alice", &[]).0.unwrap());
    }

    #[test]
    fn team_member_found_in_second_team() {
        let (result, urls) = evaluate(
            PolicyMode::AllowRepoTeamMembers,
            "alexander-testington",
            &[(200, TEAMS), (200, TEAM_ONE), (200, TEAM_99)],
        );
        assert!(result.unwrap());
        assert_eq!(
            urls,
            vec![
                "https://api.github.com/repos/example/luftballons/teams",
                "https://api.github.com/orgs/test/teams/team-one/members",
                "https://api.github.com/orgs/test/teams/team-99/members",
            ]
        );
    }

    #[test]
    fn team_lookup_stops_at_first_match() {
        let (result, urls) =
            evaluate(PolicyMode::AllowRepoTeamMembers, "alice-mctest", &[(200, TEAMS), (200, TEAM_ONE)]);
        assert!(result.unwrap());
        assert_eq!(urls.len(), 2);
    }

    #[test]
    fn non_member_of_any_team_is_denied() {
        let (result, urls) = evaluate(
            PolicyMode::AllowRepoTeamMembers,
            "username-notfound",
            &[(200, TEAMS), (200, TEAM_ONE), (200, TEAM_99)],
        );
        assert!(!result.unwrap());
        assert_eq!(urls.len(), 3);
    }

    #[test]
    fn teams_lookup_failure_is_fatal_after_one_call() {
        let (result, urls) =
            evaluate(PolicyMode::AllowRepoTeamMembers, "alexander-testington", &[(404, "Not Found")]);
        let err = result.unwrap_err();
        assert!(err.to_string().starts_with("Problem getting teams data for example/luftballons"));
        assert_eq!(urls.len(), 1);
    }

    #[test]
    fn team_members_lookup_failure_is_fatal() {
        let (result, urls) = evaluate(
            PolicyMode::AllowRepoTeamMembers,
            "alexander-testington",
            &[(200, TEAMS), (200, TEAM_ONE), (404, "Not Found")],
        );
        let err = result.unwrap_err();
        assert!(err.to_string().starts_with("Problem getting members data for a team of example/luftballons"));
        assert_eq!(urls.len(), 3);
    }

    #[test]
    fn org_membership() {
        let (result, urls) = evaluate(PolicyMode::AllowRepoOrgMembers, "alexander-testington", &[(200, ORG)]);
        assert!(result.unwrap());
        assert_eq!(urls, vec!["https://api.github.com/orgs/example/members"]);

        let (result, _) = evaluate(PolicyMode::AllowRepoOrgMembers, "not-in-this-repo", &[(200, ORG)]);
        assert!(!result.unwrap());
    }

    #[test]
    fn org_lookup_failure_is_fatal() {
        let (result, _) = evaluate(PolicyMode::AllowRepoOrgMembers, "alexander-testington", &[(404, "")]);
        assert!(result.unwrap_err().to_string().starts_with("Problem getting member data for example"));
    }

    #[test]
    fn unrecognised_mode_denies_without_lookups() {
        let (result, urls) = evaluate(PolicyMode::Unrecognized("nonsense".into()), "x", &[]);
        assert!(!result.unwrap());
        assert!(urls.is_empty());
    }

    #[test]
    fn membership_lookups_without_token_are_fatal_and_send_nothing() {
        for mode in [PolicyMode::AllowRepoOrgMembers, PolicyMode::AllowRepoTeamMembers] {
            let http = transport(&[(200, r#"[{"login": "public-member"}]"#)]);
            let config = GithubConfig::new(None);
            let github = GithubClient::new(&http, &config);

            let result = AccessPolicy::new(mode.clone()).may_bridge("private-member", "example/luftballons", &github);

            assert!(matches!(result, Err(LookupError::MissingToken { .. })), "{mode:?} gave {result:?}");
            assert!(http.requests().is_empty());
        }
    }
}
