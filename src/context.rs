//! Service context: which HTTP transport a run uses.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::adapters::live::LiveHttpTransport;
use crate::adapters::recording::RecordingHttpTransport;
use crate::adapters::replaying::ReplayingHttpTransport;
use crate::cassette::format::Cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::error::Error;
use crate::ports::http::HttpTransport;

/// Environment variable naming a cassette file to record live traffic into.
pub const RECORD_ENV: &str = "ISSUE_MIRROR_RECORD";

/// Bundles the transport with an optional recorder.
pub struct ServiceContext {
    /// Transport every client sends through.
    pub http: Box<dyn HttpTransport>,
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl ServiceContext {
    /// Real network calls.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the HTTP client cannot be built.
    pub fn live() -> Result<Self, Error> {
        let http = LiveHttpTransport::new().map_err(|e| Error::Transport(e.to_string()))?;
        Ok(Self { http: Box::new(http), recorder: None })
    }

    /// Real network calls, each recorded to a cassette at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the HTTP client cannot be built.
    pub fn recording(path: &Path) -> Result<Self, Error> {
        let live = LiveHttpTransport::new().map_err(|e| Error::Transport(e.to_string()))?;
        let recorder =
            Arc::new(Mutex::new(CassetteRecorder::new(path, "issue-mirror", env!("CARGO_PKG_VERSION"))));
        Ok(Self {
            http: Box::new(RecordingHttpTransport::new(Box::new(live), Arc::clone(&recorder))),
            recorder: Some(recorder),
        })
    }

    /// Responses served from the cassette at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cassette`] if the cassette cannot be loaded.
    pub fn replaying(path: &Path) -> Result<Self, Error> {
        let cassette = Cassette::load(path)?;
        Ok(Self { http: Box::new(ReplayingHttpTransport::from_cassette(&cassette)), recorder: None })
    }

    /// Picks replay when `replay` is given, recording when [`RECORD_ENV`]
    /// is set, and live otherwise.
    ///
    /// # Errors
    ///
    /// Propagates errors from the selected constructor.
    pub fn select(replay: Option<&Path>) -> Result<Self, Error> {
        if let Some(path) = replay {
            return Self::replaying(path);
        }
        match std::env::var_os(RECORD_ENV) {
            Some(path) if !path.is_empty() => Self::recording(Path::new(&path)),
            _ => Self::live(),
        }
    }

    /// Writes the recorded cassette, if this context records.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cassette`] if the file cannot be written.
    pub fn finish(self) -> Result<Option<PathBuf>, Error> {
        match self.recorder {
            Some(recorder) => {
                let path = recorder.lock().unwrap_or_else(PoisonError::into_inner).save()?;
                Ok(Some(path))
            }
            None => Ok(None),
        }
    }
}
