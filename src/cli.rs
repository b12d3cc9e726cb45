//! CLI argument definitions.
//!
//! Every `mirror` input can come from the environment, which is how the
//! GitHub Actions workflow hands them over.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::{
    non_empty, normalize_api_root, AsanaConfig, GithubConfig, MirrorConfig, ASANA_API_ROOT,
    GITHUB_API_ROOT, GITHUB_ISSUE_FIELD_NAME,
};
use crate::event::IssueEvent;
use crate::policy::PolicyMode;

/// Top-level CLI parser for `issue-mirror`.
#[derive(Debug, Parser)]
#[command(name = "issue-mirror", version, about = "Mirror GitHub issues into Asana tasks")]
pub struct Cli {
    /// Answer all HTTP requests from this cassette instead of the network.
    #[arg(long, global = true, env = "ISSUE_MIRROR_REPLAY", value_name = "CASSETTE")]
    pub replay: Option<PathBuf>,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text, env = "ISSUE_MIRROR_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Log output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

/// Supported subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Mirror one issue into Asana and comment back on it.
    Mirror(MirrorArgs),
    /// Show the Asana task body a Markdown file would produce. No network.
    Preview(PreviewArgs),
}

/// Inputs for `mirror`.
#[derive(Debug, Args)]
pub struct MirrorArgs {
    /// Web URL of the issue.
    #[arg(long, env = "ISSUE_URL")]
    pub issue_url: String,
    /// Issue title.
    #[arg(long, env = "ISSUE_TITLE")]
    pub issue_title: String,
    /// Issue body (Markdown).
    #[arg(long, env = "ISSUE_BODY", default_value = "")]
    pub issue_body: String,
    /// Issue creation time (RFC 3339).
    #[arg(long, env = "ISSUE_TIMESTAMP")]
    pub issue_timestamp: Option<String>,
    /// Login of the user who opened the issue.
    #[arg(long, env = "ACTOR")]
    pub actor: String,
    /// Repository as `org/repo`.
    #[arg(long, env = "REPO")]
    pub repo: String,
    /// Access policy: all, listed-users, repo-team or repo-org.
    #[arg(long, env = "ONLY_REACT_TO", default_value = "")]
    pub only_react_to: String,
    /// Comma-separated logins for the listed-users policy.
    #[arg(long, env = "ALLOWED_USERS")]
    pub allowed_users: Option<String>,
    /// Asana personal access token.
    #[arg(long, env = "ASANA_PAT", hide_env_values = true)]
    pub asana_pat: String,
    /// Asana project gid.
    #[arg(long, env = "ASANA_PROJECT")]
    pub asana_project: String,
    /// Gid of the Asana custom field holding the issue URL.
    #[arg(long, env = "ASANA_GITHUB_ISSUE_CUSTOM_FIELD_GID")]
    pub asana_issue_field_gid: Option<String>,
    /// GitHub token for membership lookups and the comment.
    #[arg(long, env = "REPO_TOKEN", hide_env_values = true)]
    pub repo_token: Option<String>,
    /// Asana API root.
    #[arg(long, env = "ASANA_API_ROOT", default_value = ASANA_API_ROOT)]
    pub asana_api_root: String,
    /// GitHub API root.
    #[arg(long, env = "GITHUB_API_ROOT", default_value = GITHUB_API_ROOT)]
    pub github_api_root: String,
}

impl MirrorArgs {
    /// Builds the run configuration.
    #[must_use]
    pub fn to_config(&self) -> MirrorConfig {
        MirrorConfig {
            asana: AsanaConfig {
                api_root: normalize_api_root(&self.asana_api_root),
                token: self.asana_pat.trim().to_string(),
                project: self.asana_project.trim().to_string(),
                issue_field_gid: non_empty(self.asana_issue_field_gid.as_deref()),
                issue_field_name: GITHUB_ISSUE_FIELD_NAME.to_string(),
            },
            github: GithubConfig {
                api_root: normalize_api_root(&self.github_api_root),
                token: non_empty(self.repo_token.as_deref()),
            },
            policy: PolicyMode::from_setting(&self.only_react_to, self.allowed_users.as_deref()),
        }
    }

    /// Builds the issue event.
    #[must_use]
    pub fn to_event(&self) -> IssueEvent {
        IssueEvent {
            url: self.issue_url.clone(),
            title: self.issue_title.clone(),
            body: self.issue_body.clone(),
            timestamp: non_empty(self.issue_timestamp.as_deref()),
            actor: self.actor.clone(),
            repo: self.repo.clone(),
        }
    }
}

/// Inputs for `preview`.
#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Markdown file to render; stdin when omitted.
    pub file: Option<PathBuf>,
    /// The project has an issue link custom field, so leave out the backlink.
    #[arg(long)]
    pub linked: bool,
    /// Issue URL used for the backlink.
    #[arg(long, default_value = "https://github.com/")]
    pub issue_url: String,
}
