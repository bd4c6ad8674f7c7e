//! Blocking HTTP transport
//!
//! `ureq` is synchronous, so each request runs on tokio's blocking pool and
//! the workflow only suspends while awaiting the join handle.

use crate::error::TransportError;
use crate::transport::{Transport, TransportRequest};
use serde_json::Value;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// [`Transport`] backed by `ureq`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpTransport {
    /// Create a transport for the server at `base_url`
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(DEFAULT_TIMEOUT).build();
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            agent,
        }
    }

    /// Absolute URL for a request path
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<Value, TransportError> {
        let url = self.endpoint(&request.url);
        let agent = self.agent.clone();
        tracing::debug!(method = request.method.as_str(), %url, "sending request");

        tokio::task::spawn_blocking(move || {
            let response = agent
                .request(request.method.as_str(), &url)
                .set("Content-Type", &request.content_type)
                .send_string(&request.body);

            match response {
                Ok(response) => {
                    let text = response
                        .into_string()
                        .map_err(|e| TransportError::Request(e.to_string()))?;
                    decode_body(&text)
                }
                Err(ureq::Error::Status(code, response)) => Err(TransportError::Status {
                    code,
                    body: response.into_string().unwrap_or_default(),
                }),
                Err(e) => Err(TransportError::Request(e.to_string())),
            }
        })
        .await
        .map_err(|e| TransportError::Worker(e.to_string()))?
    }
}

fn decode_body(text: &str) -> Result<Value, TransportError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|e| TransportError::Decode(e.to_string()))
}
