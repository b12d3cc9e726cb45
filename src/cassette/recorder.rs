//! Accumulates interactions and writes them out as a cassette.

use std::path::PathBuf;

use super::format::{Cassette, Interaction};
use crate::error::Error;

/// Records interactions in call order.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    cassette: Cassette,
}

impl CassetteRecorder {
    /// Creates a recorder that will write to `path`.
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>, commit: impl Into<String>) -> Self {
        Self { path: path.into(), cassette: Cassette::new(name, commit) }
    }

    /// Appends an interaction, numbering it after the previous one.
    pub fn record(
        &mut self,
        port: impl Into<String>,
        method: impl Into<String>,
        input: serde_json::Value,
        output: serde_json::Value,
    ) {
        let seq = self.cassette.interactions.len() as u64;
        self.cassette.interactions.push(Interaction {
            seq,
            port: port.into(),
            method: method.into(),
            input,
            output,
        });
    }

    /// Number of interactions recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cassette.interactions.len()
    }

    /// Whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cassette.interactions.is_empty()
    }

    /// Writes everything recorded so far. Can be called more than once.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be written.
    pub fn save(&self) -> Result<PathBuf, Error> {
        self.cassette.save(&self.path)?;
        Ok(self.path.clone())
    }
}
