//! On-disk cassette layout.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One call made through a port, with what went in and what came back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Position in the recording, starting at 0.
    pub seq: u64,
    /// Port name (`"http"`).
    pub port: String,
    /// Method invoked on the port (`"send"`).
    pub method: String,
    /// Serialized call arguments.
    pub input: serde_json::Value,
    /// Serialized result, `{"Ok": ..}` or `{"Err": ".."}`.
    pub output: serde_json::Value,
}

/// A named, ordered list of interactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name.
    pub name: String,
    /// When the recording was made.
    pub recorded_at: DateTime<Utc>,
    /// Source revision the recording was made from.
    pub commit: String,
    /// Interactions in call order.
    pub interactions: Vec<Interaction>,
}

impl Cassette {
    /// An empty cassette stamped with the current time.
    #[must_use]
    pub fn new(name: impl Into<String>, commit: impl Into<String>) -> Self {
        Self { name: name.into(), recorded_at: Utc::now(), commit: commit.into(), interactions: Vec::new() }
    }

    /// Appends an `http`/`send` interaction answering with `status` and `body`.
    ///
    /// Used to script directory and API responses for offline runs.
    pub fn push_http_response(&mut self, status: u16, body: impl Into<String>) {
        let seq = self.interactions.len() as u64;
        self.interactions.push(Interaction {
            seq,
            port: "http".into(),
            method: "send".into(),
            input: serde_json::Value::Null,
            output: serde_json::json!({ "Ok": { "status": status, "body": body.into() } }),
        });
    }

    /// Reads and parses a YAML cassette.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cassette`] if the file is missing or malformed.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Cassette { path: path.to_path_buf(), message: e.to_string() })?;
        serde_yaml::from_str(&content)
            .map_err(|e| Error::Cassette { path: path.to_path_buf(), message: e.to_string() })
    }

    /// Serializes and writes the cassette as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cassette`] if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let yaml = serde_yaml::to_string(self)
            .map_err(|e| Error::Cassette { path: path.to_path_buf(), message: e.to_string() })?;
        std::fs::write(path, yaml)
            .map_err(|e| Error::Cassette { path: path.to_path_buf(), message: e.to_string() })
    }
}
