//! Error types shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

/// A membership-directory lookup that did not succeed.
///
/// Access decisions cannot be made without the directory, so this error is
/// fatal: it is carried up to the process boundary, which exits non-zero.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The directory answered with a non-success status.
    #[error("{context}: {url} returned {status}: {body}")]
    Status {
        /// What was being looked up.
        context: String,
        /// The URL that was requested.
        url: String,
        /// HTTP status received.
        status: u16,
        /// Raw response body.
        body: String,
    },
    /// No credentials were configured, so the directory was not asked.
    #[error("{context}: no REPO_TOKEN configured for {url}")]
    MissingToken {
        /// What was being looked up.
        context: String,
        /// The URL that would have been requested.
        url: String,
    },
    /// No response was received.
    #[error("{context}: request to {url} failed: {message}")]
    Transport {
        /// What was being looked up.
        context: String,
        /// The URL that was requested.
        url: String,
        /// Transport error text.
        message: String,
    },
    /// The response could not be decoded.
    #[error("{context}: unexpected response from {url}: {message}")]
    Decode {
        /// What was being looked up.
        context: String,
        /// The URL that was requested.
        url: String,
        /// Decoder error text.
        message: String,
    },
}

/// Top-level error returned from [`crate::run`].
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid command-line arguments or missing configuration.
    #[error("{0}")]
    Usage(String),
    /// Fatal directory lookup failure during access evaluation.
    #[error(transparent)]
    Lookup(#[from] LookupError),
    /// The HTTP transport could not be constructed.
    #[error("HTTP transport unavailable: {0}")]
    Transport(String),
    /// A cassette could not be read, parsed or written.
    #[error("cassette {}: {message}", path.display())]
    Cassette {
        /// Cassette file path.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },
    /// A local file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
