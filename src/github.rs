//! GitHub REST calls: membership lookups and issue comments.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::config::GithubConfig;
use crate::error::LookupError;
use crate::ports::directory::{MembershipDirectory, Team};
use crate::ports::http::{HttpRequest, HttpTransport};

/// Pinned REST API version.
pub const GITHUB_API_VERSION: &str = "2022-11-28";

const WEB_ROOT: &str = "https://github.com/";
const API_REPOS_ROOT: &str = "https://api.github.com/repos/";

/// Converts an issue's web URL into its REST URL.
///
/// Replaces the first `https://github.com/` with
/// `https://api.github.com/repos/`; other URLs come back unchanged.
#[must_use]
pub fn transform_to_api_url(html_url: &str) -> String {
    html_url.replacen(WEB_ROOT, API_REPOS_ROOT, 1)
}

/// Result of posting the mirror comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentOutcome {
    /// GitHub accepted the comment.
    Posted,
    /// No token was configured; nothing was sent.
    SkippedNoToken,
    /// GitHub refused the comment or could not be reached.
    Failed {
        /// Status code, when a response arrived.
        status: Option<u16>,
        /// Response body or transport error text.
        detail: String,
    },
}

#[derive(Deserialize)]
struct Member {
    login: String,
}

/// GitHub API client over an [`HttpTransport`].
pub struct GithubClient<'a> {
    http: &'a dyn HttpTransport,
    config: &'a GithubConfig,
}

impl<'a> GithubClient<'a> {
    /// Creates a client sending through `http`.
    #[must_use]
    pub fn new(http: &'a dyn HttpTransport, config: &'a GithubConfig) -> Self {
        Self { http, config }
    }

    fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![("Accept".to_string(), "application/vnd.github+json".to_string())];
        if let Some(token) = &self.config.token {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token.trim())));
        }
        headers.push(("X-GitHub-Api-Version".to_string(), GITHUB_API_VERSION.to_string()));
        headers
    }

    /// Anonymous requests only see public memberships, so lookups refuse to
    /// run without a token.
    fn get_list<T: DeserializeOwned>(&self, url: &str, context: &str) -> Result<Vec<T>, LookupError> {
        if self.config.token.is_none() {
            return Err(LookupError::MissingToken { context: context.to_string(), url: url.to_string() });
        }

        let request = HttpRequest::get(url).with_headers(self.headers());
        let response = self.http.send(&request).map_err(|e| LookupError::Transport {
            context: context.to_string(),
            url: url.to_string(),
            message: e.to_string(),
        })?;

        if !response.is_success() {
            return Err(LookupError::Status {
                context: context.to_string(),
                url: url.to_string(),
                status: response.status,
                body: response.body,
            });
        }

        serde_json::from_str(&response.body).map_err(|e| LookupError::Decode {
            context: context.to_string(),
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    /// Posts `body` as a comment on the issue at `issue_api_url`.
    #[must_use]
    pub fn comment_on_issue(&self, issue_api_url: &str, body: &str) -> CommentOutcome {
        if self.config.token.is_none() {
            tracing::warn!("No REPO_TOKEN found - cannot update Issue");
            return CommentOutcome::SkippedNoToken;
        }

        let url = format!("{issue_api_url}/comments");
        let request = HttpRequest::post(&url, json!({ "body": body })).with_headers(self.headers());

        match self.http.send(&request) {
            Ok(response) if response.status == 201 => {
                tracing::info!("Asana task URL added in comment on original issue");
                CommentOutcome::Posted
            }
            Ok(response) => {
                tracing::warn!(status = response.status, "Commenting failed: {}", response.body);
                CommentOutcome::Failed { status: Some(response.status), detail: response.body }
            }
            Err(e) => {
                tracing::warn!(url = %url, "Commenting failed: {e}");
                CommentOutcome::Failed { status: None, detail: e.to_string() }
            }
        }
    }
}

impl MembershipDirectory for GithubClient<'_> {
    fn repo_teams(&self, repo: &str) -> Result<Vec<Team>, LookupError> {
        let url = format!("{}repos/{repo}/teams", self.config.api_root);
        self.get_list(&url, &format!("Problem getting teams data for {repo}"))
    }

    fn team_members(&self, repo: &str, team: &Team) -> Result<Vec<String>, LookupError> {
        // members_url is a URI template: ".../members{/member}"
        let url = team.members_url.split('{').next().unwrap_or_default();
        let members: Vec<Member> =
            self.get_list(url, &format!("Problem getting members data for a team of {repo}"))?;
        Ok(members.into_iter().map(|m| m.login).collect())
    }

    fn org_members(&self, org: &str) -> Result<Vec<String>, LookupError> {
        let url = format!("{}orgs/{org}/members", self.config.api_root);
        let members: Vec<Member> =
            self.get_list(&url, &format!("Problem getting member data for {org}"))?;
        Ok(members.into_iter().map(|m| m.login).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::replaying::ReplayingHttpTransport;
    use crate::cassette::format::Cassette;
    use crate::ports::http::Method;

    fn transport(responses: &[(u16, &str)]) -> ReplayingHttpTransport {
        let mut cassette = Cassette::new("github", "test");
        for (status, body) in responses {
            cassette.push_http_response(*status, *body);
        }
        ReplayingHttpTransport::from_cassette(&cassette)
    }

    fn config(token: Option<&str>) -> GithubConfig {
        GithubConfig::new(token.map(str::to_string))
    }

    #[test]
    fn transforms_github_urls_only() {
        assert_eq!(
            transform_to_api_url("https://github.com/mozilla/bedrock"),
            "https://api.github.com/repos/mozilla/bedrock"
        );
        assert_eq!(
            transform_to_api_url("https://gitlab.com/mozmeao/bedrock"),
            "https://gitlab.com/mozmeao/bedrock"
        );
    }

    #[test]
    fn sends_standard_headers() {
        let http = transport(&[(200, "[]")]);
        let config = config(Some("test-token-for-github"));
        GithubClient::new(&http, &config).org_members("example").unwrap();

        let request = &http.requests()[0];
        assert_eq!(request.url, "https://api.github.com/orgs/example/members");
        assert_eq!(
            request.headers,
            vec![
                ("Accept".to_string(), "application/vnd.github+json".to_string()),
                ("Authorization".to_string(), "Bearer test-token-for-github".to_string()),
                ("X-GitHub-Api-Version".to_string(), "2022-11-28".to_string()),
            ]
        );
    }

    #[test]
    fn team_members_url_drops_uri_template() {
        let http = transport(&[(200, r#"[{"login": "alice-mctest", "id": 1}]"#)]);
        let config = config(Some("t"));
        let team = Team {
            members_url: "https://api.github.com/orgs/test/teams/team-one/members{/member}".into(),
        };

        let members = GithubClient::new(&http, &config).team_members("example/luftballons", &team).unwrap();

        assert_eq!(members, vec!["alice-mctest"]);
        assert_eq!(http.requests()[0].url, "https://api.github.com/orgs/test/teams/team-one/members");
    }

    #[test]
    fn non_success_lookup_is_an_error() {
        let http = transport(&[(404, "Not Found")]);
        let config = config(Some("t"));
        let err = GithubClient::new(&http, &config).repo_teams("example/luftballons").unwrap_err();

        assert!(err.to_string().starts_with("Problem getting teams data for example/luftballons"));
        assert!(matches!(err, LookupError::Status { status: 404, .. }));
    }

    #[test]
    fn undecodable_lookup_is_an_error() {
        let http = transport(&[(200, "{not json")]);
        let config = config(Some("t"));
        let err = GithubClient::new(&http, &config).org_members("example").unwrap_err();
        assert!(matches!(err, LookupError::Decode { .. }));
    }

    #[test]
    fn comment_posts_to_comments_endpoint() {
        let http = transport(&[(201, "{}")]);
        let config = config(Some("test-token-for-github"));
        let outcome = GithubClient::new(&http, &config)
            .comment_on_issue("https://api.github.com/example/luftballons/issues/123", "hello");

        assert_eq!(outcome, CommentOutcome::Posted);
        let request = &http.requests()[0];
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url, "https://api.github.com/example/luftballons/issues/123/comments");
        assert_eq!(request.body, Some(json!({"body": "hello"})));
    }

    #[test]
    fn comment_failure_is_reported() {
        let http = transport(&[(404, "fake response text")]);
        let config = config(Some("t"));
        let outcome = GithubClient::new(&http, &config).comment_on_issue("https://x/issues/1", "hi");
        assert_eq!(
            outcome,
            CommentOutcome::Failed { status: Some(404), detail: "fake response text".into() }
        );
    }

    #[test]
    fn comment_without_token_sends_nothing() {
        let http = transport(&[]);
        let config = config(None);
        let outcome = GithubClient::new(&http, &config).comment_on_issue("https://x/issues/1", "hi");
        assert_eq!(outcome, CommentOutcome::SkippedNoToken);
        assert!(http.requests().is_empty());
    }
}
