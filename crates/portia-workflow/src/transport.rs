//! Transport collaborator
//!
//! The coordinator only describes the request; retries, auth and the
//! actual wire live behind [`Transport`].

use crate::error::TransportError;
use serde_json::Value;
use std::sync::Arc;

/// HTTP method of a transport request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Post,
}

impl Method {
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Post => "POST",
        }
    }
}

/// Description of one outbound request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub method: Method,
    /// URL relative to the transport's base
    pub url: String,
    pub content_type: String,
    /// UTF-8 encoded body
    pub body: String,
}

impl TransportRequest {
    /// POST a JSON document
    #[must_use]
    pub fn post_json(url: impl Into<String>, content_type: impl Into<String>, body: &Value) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            content_type: content_type.into(),
            body: body.to_string(),
        }
    }

    /// Parse the body back into JSON
    ///
    /// # Errors
    /// Returns `TransportError::Decode` if the body is not JSON
    pub fn json_body(&self) -> Result<Value, TransportError> {
        serde_json::from_str(&self.body).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

/// Sends requests and resolves with the decoded response
///
/// Implement this trait to connect the workflow to a backend.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Send one request
    ///
    /// Resolves with the JSON response body (`Value::Null` when empty), or
    /// fails with the reason the request was not confirmed.
    async fn send(&self, request: TransportRequest) -> Result<Value, TransportError>;
}

#[async_trait::async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: TransportRequest) -> Result<Value, TransportError> {
        (**self).send(request).await
    }
}
