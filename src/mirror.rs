//! Runs one issue through policy, task creation and comment-back.

use crate::asana::AsanaClient;
use crate::config::MirrorConfig;
use crate::error::LookupError;
use crate::event::IssueEvent;
use crate::github::{transform_to_api_url, CommentOutcome, GithubClient};
use crate::policy::AccessPolicy;
use crate::ports::http::HttpTransport;
use crate::sanitize::Sanitizer;

/// Added to the issue comment when the task body had content removed.
pub const CONTENT_CHANGED_WARNING: &str =
    "Some of this issue's content could not be displayed in Asana, so the task description is incomplete.";

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorReport {
    /// The actor is not allowed to bridge; nothing was created.
    Denied,
    /// Asana refused the task; the issue was not commented on.
    TaskFailed {
        /// Why creation failed.
        reason: String,
    },
    /// The task exists.
    Mirrored {
        /// Task permalink.
        permalink: String,
        /// Whether content was dropped during sanitization.
        content_changed: bool,
        /// What happened to the comment on the issue.
        comment: CommentOutcome,
    },
}

/// Text of the comment linking the issue to its task.
#[must_use]
pub fn comment_body(permalink: &str, content_changed: bool) -> String {
    let mut body = format!("This issue has been mirrored to Asana: {permalink}");
    if content_changed {
        body.push_str("\n\n");
        body.push_str(CONTENT_CHANGED_WARNING);
    }
    body
}

/// Sequences a single mirror run.
pub struct Mirror<'a> {
    config: &'a MirrorConfig,
    http: &'a dyn HttpTransport,
    sanitizer: Sanitizer,
}

impl<'a> Mirror<'a> {
    /// Creates a mirror using the Asana allowlist.
    #[must_use]
    pub fn new(config: &'a MirrorConfig, http: &'a dyn HttpTransport) -> Self {
        Self { config, http, sanitizer: Sanitizer::default() }
    }

    /// Mirrors `event`.
    ///
    /// # Errors
    ///
    /// Returns a [`LookupError`] when the access policy could not consult
    /// the membership directory. Callers should treat it as fatal.
    pub fn run(&self, event: &IssueEvent) -> Result<MirrorReport, LookupError> {
        let github = GithubClient::new(self.http, &self.config.github);

        let policy = AccessPolicy::new(self.config.policy.clone());
        if !policy.may_bridge(&event.actor, &event.repo, &github)? {
            tracing::info!(
                "{} is not permitted to bridge issues from {}. Not mirroring Issue to Asana",
                event.actor,
                event.repo
            );
            return Ok(MirrorReport::Denied);
        }

        let asana = AsanaClient::new(self.http, &self.config.asana);
        let outcome = asana.create_task(event, &self.sanitizer);
        let permalink = match outcome.result {
            Ok(permalink) => permalink,
            Err(e) => {
                tracing::error!(error = %e, "not commenting on the issue because no task was created");
                return Ok(MirrorReport::TaskFailed { reason: e.to_string() });
            }
        };

        let issue_api_url = transform_to_api_url(&event.url);
        let comment =
            github.comment_on_issue(&issue_api_url, &comment_body(&permalink, outcome.content_changed));

        Ok(MirrorReport::Mirrored { permalink, content_changed: outcome.content_changed, comment })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::replaying::ReplayingHttpTransport;
    use crate::cassette::format::Cassette;
    use crate::config::{AsanaConfig, GithubConfig};
    use crate::policy::PolicyMode;
    use crate::ports::http::Method;

    const CREATED: &str = r#"{"data": {"permalink_url": "https://asana.example.com/task/1234"}}"#;

    fn transport(responses: &[(u16, &str)]) -> ReplayingHttpTransport {
        let mut cassette = Cassette::new("mirror", "test");
        for (status, body) in responses {
            cassette.push_http_response(*status, *body);
        }
        ReplayingHttpTransport::from_cassette(&cassette)
    }

    fn config(policy: PolicyMode, github_token: Option<&str>) -> MirrorConfig {
        MirrorConfig {
            asana: AsanaConfig {
                issue_field_gid: Some("field-gid".into()),
                ..AsanaConfig::new("pat", "project-gid")
            },
            github: GithubConfig::new(github_token.map(str::to_string)),
            policy,
        }
    }

    fn event(body: &str) -> IssueEvent {
        IssueEvent {
            url: "https://github.com/example/luftballons/issues/99".into(),
            title: "99 Red Balloons".into(),
            body: body.into(),
            timestamp: Some("2024-05-01T10:00:00Z".into()),
            actor: "alexander-testington".into(),
            repo: "example/luftballons".into(),
        }
    }

    #[test]
    fn comment_mentions_permalink_and_warning() {
        assert_eq!(comment_body("https://t/1", false), "This issue has been mirrored to Asana: https://t/1");
        assert!(comment_body("https://t/1", true).ends_with(CONTENT_CHANGED_WARNING));
    }

    #[test]
    fn denied_actor_triggers_no_posts() {
        let http = transport(&[(200, "[]")]);
        let config = config(PolicyMode::AllowRepoOrgMembers, Some("t"));

        let report = Mirror::new(&config, &http).run(&event("body")).unwrap();

        assert_eq!(report, MirrorReport::Denied);
        let requests = http.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests.iter().all(|r| r.method == Method::Get));
    }

    #[test]
    fn mirrors_and_comments_on_api_url() {
        let http = transport(&[(201, CREATED), (201, "{}")]);
        let config = config(PolicyMode::AllowAll, Some("t"));

        let report = Mirror::new(&config, &http).run(&event("<script>x</script>")).unwrap();

        assert_eq!(
            report,
            MirrorReport::Mirrored {
                permalink: "https://asana.example.com/task/1234".into(),
                content_changed: true,
                comment: CommentOutcome::Posted,
            }
        );
        let requests = http.requests();
        assert_eq!(requests[0].url, "https://app.asana.com/api/1.0/tasks");
        assert_eq!(
            requests[1].url,
            "https://api.github.com/repos/example/luftballons/issues/99/comments"
        );
        let comment = requests[1].body.as_ref().unwrap()["body"].as_str().unwrap().to_string();
        assert!(comment.contains("https://asana.example.com/task/1234"));
        assert!(comment.contains(CONTENT_CHANGED_WARNING));
    }

    #[test]
    fn failed_task_skips_comment() {
        let http = transport(&[(400, "bad request")]);
        let config = config(PolicyMode::AllowAll, Some("t"));

        let report = Mirror::new(&config, &http).run(&event("body")).unwrap();

        assert!(matches!(report, MirrorReport::TaskFailed { .. }));
        assert_eq!(http.requests().len(), 1);
    }

    #[test]
    fn missing_github_token_still_creates_task() {
        let http = transport(&[(201, CREATED)]);
        let config = config(PolicyMode::AllowAll, None);

        let report = Mirror::new(&config, &http).run(&event("body")).unwrap();

        assert!(matches!(report, MirrorReport::Mirrored { comment: CommentOutcome::SkippedNoToken, .. }));
        assert_eq!(http.requests().len(), 1);
    }

    #[test]
    fn directory_failure_propagates() {
        let http = transport(&[(500, "boom")]);
        let config = config(PolicyMode::AllowRepoTeamMembers, Some("t"));

        let err = Mirror::new(&config, &http).run(&event("body")).unwrap_err();

        assert!(matches!(err, LookupError::Status { status: 500, .. }));
        assert_eq!(http.requests().len(), 1);
    }
}
