//! Transport port for the GraphQL control plane.
//!
//! A [`Transport`] performs exactly one authenticated round-trip per call and
//! never retries on its own. Retry, backoff, and error classification live in
//! [`ResilientClient`](crate::application::resilient::ResilientClient).

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A GraphQL operation and its variables, serialized as the POST body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphqlRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Map<String, Value>>,
}

impl GraphqlRequest {
    /// An operation without variables.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: None,
        }
    }

    /// Add a variable, creating the variable map on first use.
    #[must_use]
    pub fn var(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.variables
            .get_or_insert_with(Map::new)
            .insert(name.to_string(), value.into());
        self
    }

    /// Look up a variable by name.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.as_ref().and_then(|vars| vars.get(name))
    }
}

/// One entry of a GraphQL `errors` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlError {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl GraphqlError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
            extensions: None,
        }
    }
}

impl fmt::Display for GraphqlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Parsed response envelope.
///
/// `errors` is kept as received: an empty list is still an `errors` field.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Vec<GraphqlError>>,
}

impl GraphqlResponse {
    /// A response carrying only `data`.
    #[must_use]
    pub fn data(data: Value) -> Self {
        Self {
            data: Some(data),
            errors: None,
        }
    }

    /// True when the envelope has an `errors` field, regardless of `data`.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors.is_some()
    }
}

/// Certificate verification mode for a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsVerification {
    Verified,
    /// Verification disabled. Only used when the operator opted in.
    Relaxed,
}

/// Raw failure of a single round-trip.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("TLS handshake failed: {0}")]
    Tls(String),

    #[error("invalid response body: {0}")]
    Body(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl TransportError {
    /// True for certificate or handshake failures.
    #[must_use]
    pub const fn is_tls(&self) -> bool {
        matches!(self, Self::Tls(_))
    }
}

/// A single authenticated call to the control-plane endpoint.
///
/// Implementations hold no mutable state between calls.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        request: &GraphqlRequest,
        tls: TlsVerification,
    ) -> Result<GraphqlResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for &T {
    async fn send(
        &self,
        request: &GraphqlRequest,
        tls: TlsVerification,
    ) -> Result<GraphqlResponse, TransportError> {
        (**self).send(request, tls).await
    }
}
