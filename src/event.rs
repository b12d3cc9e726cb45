//! The issue event that triggers a mirror run.

use serde::{Deserialize, Serialize};

/// A newly opened GitHub issue, as handed over by the workflow trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueEvent {
    /// Web URL of the issue (`https://github.com/org/repo/issues/N`).
    pub url: String,
    /// Issue title; becomes the task name.
    pub title: String,
    /// Issue body in Markdown.
    pub body: String,
    /// RFC-3339 creation time, when the trigger supplies one.
    pub timestamp: Option<String>,
    /// Login of the user who opened the issue.
    pub actor: String,
    /// Repository as `"org/repo"`.
    pub repo: String,
}
