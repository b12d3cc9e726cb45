//! Replaying adapter for the `HttpTransport` port.

use std::sync::{Mutex, PoisonError};

use super::replay_result;
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::http::{HttpRequest, HttpResponse, HttpTransport};

/// Serves recorded HTTP responses in order and remembers what was asked.
pub struct ReplayingHttpTransport {
    replayer: Mutex<CassetteReplayer>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ReplayingHttpTransport {
    /// Creates a transport backed by the given replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer), requests: Mutex::new(Vec::new()) }
    }

    /// Creates a transport serving the interactions of `cassette`.
    #[must_use]
    pub fn from_cassette(cassette: &Cassette) -> Self {
        Self::new(CassetteReplayer::new(cassette))
    }

    /// Every request received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Interactions left unserved.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.replayer.lock().unwrap_or_else(PoisonError::into_inner).remaining()
    }
}

impl HttpTransport for ReplayingHttpTransport {
    fn send(
        &self,
        request: &HttpRequest,
    ) -> Result<HttpResponse, Box<dyn std::error::Error + Send + Sync>> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).push(request.clone());
        let interaction = self
            .replayer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .next_interaction("http", "send")?;
        replay_result(interaction.output)
    }
}
