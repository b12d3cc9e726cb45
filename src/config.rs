//! Immutable run configuration.
//!
//! Built once from the command line / environment in [`crate::cli`] and
//! passed by reference to every component that needs it.

use crate::policy::PolicyMode;

/// Default Asana REST root.
pub const ASANA_API_ROOT: &str = "https://app.asana.com/api/1.0/";
/// Default GitHub REST root.
pub const GITHUB_API_ROOT: &str = "https://api.github.com/";
/// Name of the Asana custom field that holds the issue URL.
pub const GITHUB_ISSUE_FIELD_NAME: &str = "Github Issue";

/// Asana connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsanaConfig {
    /// API root, always ending in `/`.
    pub api_root: String,
    /// Personal access token.
    pub token: String,
    /// Project gid new tasks are added to.
    pub project: String,
    /// Pre-supplied gid of the issue URL custom field; skips the lookup.
    pub issue_field_gid: Option<String>,
    /// Custom field name matched case-insensitively during the lookup.
    pub issue_field_name: String,
}

impl AsanaConfig {
    /// Settings against the public Asana API.
    #[must_use]
    pub fn new(token: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            api_root: ASANA_API_ROOT.to_string(),
            token: token.into(),
            project: project.into(),
            issue_field_gid: None,
            issue_field_name: GITHUB_ISSUE_FIELD_NAME.to_string(),
        }
    }
}

/// GitHub connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubConfig {
    /// API root, always ending in `/`.
    pub api_root: String,
    /// Token for directory lookups and commenting. Commenting is skipped
    /// without one.
    pub token: Option<String>,
}

impl GithubConfig {
    /// Settings against the public GitHub API.
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self { api_root: GITHUB_API_ROOT.to_string(), token }
    }
}

/// Everything a mirror run needs besides the event itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorConfig {
    /// Asana settings.
    pub asana: AsanaConfig,
    /// GitHub settings.
    pub github: GithubConfig,
    /// Who may trigger a mirror.
    pub policy: PolicyMode,
}

/// Ensures `root` ends with exactly one `/`.
#[must_use]
pub fn normalize_api_root(root: &str) -> String {
    format!("{}/", root.trim_end_matches('/'))
}

/// Treats empty and whitespace-only settings as unset.
#[must_use]
pub fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}
