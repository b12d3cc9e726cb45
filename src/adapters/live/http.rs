//! Live adapter for the `HttpTransport` port using blocking reqwest.

use reqwest::blocking::Client;

use crate::ports::http::{HttpRequest, HttpResponse, HttpTransport, Method};

const USER_AGENT: &str = concat!("issue-mirror/", env!("CARGO_PKG_VERSION"));

/// Live transport that performs real network calls.
pub struct LiveHttpTransport {
    client: Client,
}

impl LiveHttpTransport {
    /// Creates a new live transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }
}

impl HttpTransport for LiveHttpTransport {
    fn send(
        &self,
        request: &HttpRequest,
    ) -> Result<HttpResponse, Box<dyn std::error::Error + Send + Sync>> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().map_err(|e| -> Box<dyn std::error::Error + Send + Sync> {
            format!("request to {} failed: {e}", request.url).into()
        })?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|e| -> Box<dyn std::error::Error + Send + Sync> {
            format!("failed to read response from {}: {e}", request.url).into()
        })?;

        Ok(HttpResponse { status, body })
    }
}
