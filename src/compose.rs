//! Builds the `html_notes` document for an Asana task.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::sanitize::SanitizationResult;

/// Appended to the task body when sanitization removed content.
pub const CONTENT_CHANGED_DISCLAIMER: &str =
    "Note: The original Issue contained content which cannot be displayed in an Asana Task";

/// Wraps sanitized content in a `<body>` document.
///
/// Parts are emitted in a fixed order: content, then the backlink to
/// `issue_url` (only when `backlink_needed`), then the disclaimer (only when
/// content changed). `timestamp` is an RFC-3339 issue creation time, shown
/// next to the backlink when it parses.
#[must_use]
pub fn compose(
    sanitized: &SanitizationResult,
    issue_url: &str,
    backlink_needed: bool,
    timestamp: Option<&str>,
) -> String {
    let mut body = String::from("<body>");
    body.push_str(&sanitized.html);

    if backlink_needed {
        let _ = write!(
            body,
            "\n<strong>Original issue</strong> on <a href=\"{}\">Github</a>",
            escape_attribute(issue_url)
        );
        if let Some(opened_at) = timestamp.and_then(format_timestamp) {
            let _ = write!(body, " opened at {opened_at}");
        }
    }

    if sanitized.content_changed {
        body.push_str("\n<hr>\n");
        body.push_str(CONTENT_CHANGED_DISCLAIMER);
    }

    body.push_str("</body>");
    body
}

/// `2024-05-01T10:00:00Z` -> `2024-05-01 10:00:00 UTC`.
fn format_timestamp(raw: &str) -> Option<String> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc).format("%Y-%m-%d %H:%M:%S UTC").to_string()),
        Err(e) => {
            tracing::warn!(timestamp = raw, error = %e, "ignoring unparseable issue timestamp");
            None
        }
    }
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;").replace('<', "&lt;")
}
