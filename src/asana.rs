//! Asana REST calls: custom field discovery and task creation.

use serde::Deserialize;
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::compose::compose;
use crate::config::AsanaConfig;
use crate::event::IssueEvent;
use crate::ports::http::{HttpRequest, HttpTransport};
use crate::sanitize::Sanitizer;

/// Text historically used in place of a permalink when creation failed.
pub const UNABLE_TO_CREATE_TASK: &str = "Error creating Asana task";

/// Why a task could not be created.
#[derive(Debug, Error)]
pub enum CreateTaskError {
    /// Asana answered with something other than `201 Created`.
    #[error("Asana rejected task creation with status {status}: {body}")]
    Rejected {
        /// HTTP status received.
        status: u16,
        /// Raw response body.
        body: String,
    },
    /// The request never got a response.
    #[error("Asana task creation request failed: {0}")]
    Transport(String),
    /// `201 Created` without a `data.permalink_url`.
    #[error("Asana created the task but returned no permalink")]
    MissingPermalink,
}

/// What [`AsanaClient::create_task`] produced.
#[derive(Debug)]
pub struct TaskCreationOutcome {
    /// Task permalink, or why there is none.
    pub result: Result<String, CreateTaskError>,
    /// Whether the issue body lost content on its way into the task.
    pub content_changed: bool,
}

impl TaskCreationOutcome {
    /// The permalink, or [`UNABLE_TO_CREATE_TASK`] on failure.
    #[must_use]
    pub fn permalink_or_sentinel(&self) -> &str {
        self.result.as_deref().unwrap_or(UNABLE_TO_CREATE_TASK)
    }
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize, Default)]
struct ProjectSettings {
    #[serde(default)]
    custom_field_settings: Vec<CustomFieldSetting>,
}

#[derive(Deserialize)]
struct CustomFieldSetting {
    custom_field: CustomField,
}

#[derive(Deserialize)]
struct CustomField {
    name: String,
    gid: String,
}

#[derive(Deserialize)]
struct CreatedTask {
    permalink_url: Option<String>,
}

/// Asana API client over an [`HttpTransport`].
pub struct AsanaClient<'a> {
    http: &'a dyn HttpTransport,
    config: &'a AsanaConfig,
}

impl<'a> AsanaClient<'a> {
    /// Creates a client sending through `http`.
    #[must_use]
    pub fn new(http: &'a dyn HttpTransport, config: &'a AsanaConfig) -> Self {
        Self { http, config }
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("Accept".to_string(), "application/json".to_string()),
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Authorization".to_string(), format!("Bearer {}", self.config.token.trim())),
        ]
    }

    /// The gid of the project's issue URL custom field, if it has one.
    ///
    /// A configured gid is returned without any request. Otherwise the
    /// project settings are fetched and the field is matched by name,
    /// ignoring case. Lookup failures mean "no field".
    #[must_use]
    pub fn issue_field_gid(&self) -> Option<String> {
        if let Some(gid) = &self.config.issue_field_gid {
            return Some(gid.clone());
        }

        let url = format!("{}projects/{}", self.config.api_root, self.config.project);
        let request = HttpRequest::get(&url).with_headers(self.headers());
        let response = match self.http.send(&request) {
            Ok(response) if response.status == 200 => response,
            Ok(response) => {
                tracing::warn!(status = response.status, "could not read Asana project settings");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not reach Asana for project settings");
                return None;
            }
        };

        let settings = match serde_json::from_str::<Envelope<ProjectSettings>>(&response.body) {
            Ok(envelope) => envelope.data,
            Err(e) => {
                tracing::warn!(error = %e, "unexpected Asana project settings payload");
                return None;
            }
        };

        let wanted = &self.config.issue_field_name;
        let gid = settings
            .custom_field_settings
            .into_iter()
            .map(|setting| setting.custom_field)
            .find(|field| field.name.to_lowercase() == wanted.to_lowercase())
            .map(|field| field.gid);
        if gid.is_none() {
            tracing::info!(field = %wanted, "project has no issue link custom field");
        }
        gid
    }

    /// Creates a task mirroring `event` in the configured project.
    ///
    /// When the project has an issue URL custom field the URL goes there;
    /// otherwise the task body carries a backlink instead.
    #[must_use]
    pub fn create_task(&self, event: &IssueEvent, sanitizer: &Sanitizer) -> TaskCreationOutcome {
        let field_gid = self.issue_field_gid();
        let sanitized = sanitizer.sanitize(&event.body);
        let html_notes =
            compose(&sanitized, &event.url, field_gid.is_none(), event.timestamp.as_deref());

        let mut data = json!({
            "projects": [self.config.project],
            "name": event.title,
            "html_notes": html_notes,
        });
        if let Some(gid) = field_gid {
            let mut fields = Map::new();
            fields.insert(gid, Value::String(event.url.clone()));
            data["custom_fields"] = Value::Object(fields);
        }

        let url = format!("{}tasks", self.config.api_root);
        let request = HttpRequest::post(url, json!({ "data": data })).with_headers(self.headers());

        TaskCreationOutcome { result: self.submit(&request), content_changed: sanitized.content_changed }
    }

    fn submit(&self, request: &HttpRequest) -> Result<String, CreateTaskError> {
        let response = self.http.send(request).map_err(|e| {
            tracing::error!(error = %e, "Asana task creation request failed");
            CreateTaskError::Transport(e.to_string())
        })?;

        if response.status != 201 {
            tracing::error!(status = response.status, body = %response.body, "Asana rejected task");
            return Err(CreateTaskError::Rejected { status: response.status, body: response.body });
        }

        let permalink = serde_json::from_str::<Envelope<CreatedTask>>(&response.body)
            .ok()
            .and_then(|envelope| envelope.data.permalink_url)
            .ok_or(CreateTaskError::MissingPermalink)?;
        tracing::info!("Asana task created: {permalink}");
        Ok(permalink)
    }
}
