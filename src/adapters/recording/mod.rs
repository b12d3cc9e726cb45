//! Recording adapters that capture interactions to cassettes.

pub mod http;

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use crate::cassette::recorder::CassetteRecorder;

pub use http::RecordingHttpTransport;

/// Records a `Result<T, E>` interaction.
///
/// `Ok(v)` is stored as `{"Ok": v}` and `Err(e)` as `{"Err": e.to_string()}`,
/// the shape [`crate::adapters::replaying::replay_result`] reads back.
pub(crate) fn record_result<I, T, E>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    I: Serialize,
    T: Serialize,
    E: std::fmt::Display,
{
    let input = serde_json::to_value(input).unwrap_or_default();
    let output = match result {
        Ok(value) => serde_json::json!({ "Ok": serde_json::to_value(value).unwrap_or_default() }),
        Err(e) => serde_json::json!({ "Err": e.to_string() }),
    };

    recorder.lock().unwrap_or_else(PoisonError::into_inner).record(port, method, input, output);
}
