//! Recording adapter for the `HttpTransport` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::http::{HttpRequest, HttpResponse, HttpTransport};

/// Header values that must never reach a cassette file.
const REDACTED_HEADERS: &[&str] = &["authorization"];

/// Records each request and its result while delegating to `inner`.
pub struct RecordingHttpTransport {
    inner: Box<dyn HttpTransport>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingHttpTransport {
    /// Wraps `inner`, appending every call to `recorder`.
    pub fn new(inner: Box<dyn HttpTransport>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

/// Copy of `request` with credential headers replaced.
fn redacted(request: &HttpRequest) -> HttpRequest {
    let mut copy = request.clone();
    for (name, value) in &mut copy.headers {
        if REDACTED_HEADERS.iter().any(|h| name.eq_ignore_ascii_case(h)) {
            *value = "<redacted>".to_string();
        }
    }
    copy
}

impl HttpTransport for RecordingHttpTransport {
    fn send(
        &self,
        request: &HttpRequest,
    ) -> Result<HttpResponse, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.send(request);
        record_result(&self.recorder, "http", "send", &redacted(request), &result);
        result
    }
}
