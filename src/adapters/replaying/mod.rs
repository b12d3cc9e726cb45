//! Replaying adapters that answer from recorded interactions.

pub mod http;

use serde::de::DeserializeOwned;

pub use http::ReplayingHttpTransport;

/// Decodes an `{"Ok": v}` / `{"Err": "msg"}` output written by the recorder.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: serde_json::Value,
) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
    match output {
        serde_json::Value::Object(mut map) => {
            if let Some(ok) = map.remove("Ok") {
                return serde_json::from_value(ok).map_err(|e| format!("malformed Ok output: {e}").into());
            }
            if let Some(err) = map.remove("Err") {
                let message = err.as_str().map_or_else(|| err.to_string(), str::to_string);
                return Err(message.into());
            }
            Err("cassette output has neither Ok nor Err".into())
        }
        other => Err(format!("cassette output is not an object: {other}").into()),
    }
}
