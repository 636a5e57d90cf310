//! reqwest-backed [`Transport`].
//!
//! One POST per call with a bearer `Authorization` header. Non-200 statuses,
//! connection failures, timeouts, and TLS failures are mapped onto
//! [`TransportError`] variants; nothing is retried here.

use std::error::Error as StdError;
use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};
use url::Url;

use crate::error::{ConfigError, Result};
use crate::infrastructure::config::api::{ApiConfig, Secret};
use crate::port::{GraphqlRequest, GraphqlResponse, TlsVerification, Transport, TransportError};

/// Longest error body kept in [`TransportError::Status`].
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug)]
pub struct HttpTransport {
    endpoint: Url,
    headers: HeaderMap,
    user_agent: String,
    connect_timeout: Duration,
    read_timeout: Duration,
    verified: Option<Client>,
    /// Built on first relaxed call.
    relaxed: OnceLock<Client>,
}

impl HttpTransport {
    /// Build a transport for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns a config error for an unparseable endpoint or a token that is
    /// not a valid header value, and an HTTP error if the client cannot be built.
    pub fn from_config(config: &ApiConfig, token: &Secret) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| ConfigError::InvalidValue {
            field: "api.endpoint",
            reason: e.to_string(),
        })?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.expose())).map_err(
            |_| ConfigError::InvalidValue {
                field: "ZEABUR_API_KEY",
                reason: "not a valid header value".into(),
            },
        )?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut transport = Self {
            endpoint,
            headers,
            user_agent: config.user_agent.clone(),
            connect_timeout: config.connect_timeout(),
            read_timeout: config.read_timeout(),
            verified: None,
            relaxed: OnceLock::new(),
        };
        transport.verified = Some(transport.build_client(TlsVerification::Verified)?);
        Ok(transport)
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn build_client(&self, tls: TlsVerification) -> Result<Client> {
        let client = Client::builder()
            .default_headers(self.headers.clone())
            .user_agent(self.user_agent.clone())
            .connect_timeout(self.connect_timeout)
            .read_timeout(self.read_timeout)
            .danger_accept_invalid_certs(tls == TlsVerification::Relaxed)
            .build()?;
        Ok(client)
    }

    fn client(&self, tls: TlsVerification) -> std::result::Result<&Client, TransportError> {
        match tls {
            TlsVerification::Verified => self
                .verified
                .as_ref()
                .ok_or_else(|| TransportError::Request("HTTP client not initialized".into())),
            TlsVerification::Relaxed => {
                if let Some(client) = self.relaxed.get() {
                    return Ok(client);
                }
                warn!(endpoint = %self.endpoint, "Certificate verification disabled for this attempt");
                let client = self
                    .build_client(TlsVerification::Relaxed)
                    .map_err(|e| TransportError::Request(e.to_string()))?;
                Ok(self.relaxed.get_or_init(|| client))
            }
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        request: &GraphqlRequest,
        tls: TlsVerification,
    ) -> std::result::Result<GraphqlResponse, TransportError> {
        let client = self.client(tls)?;
        let response = client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!(status = status.as_u16(), "Control plane returned non-200");
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: status_body(response.text().await),
            });
        }

        let bytes = response.bytes().await.map_err(classify)?;
        serde_json::from_slice(&bytes).map_err(|e| TransportError::Body(e.to_string()))
    }
}

/// Map a reqwest failure onto the transport taxonomy.
fn classify(err: reqwest::Error) -> TransportError {
    let text = err.to_string();
    if err.is_timeout() {
        TransportError::Timeout(text)
    } else if is_tls_failure(&err) {
        TransportError::Tls(describe(&err))
    } else if err.is_connect() {
        TransportError::Connect(describe(&err))
    } else if err.is_decode() || err.is_body() {
        TransportError::Body(text)
    } else {
        TransportError::Request(text)
    }
}

/// True when any error in the chain is a rustls failure or mentions a certificate.
fn is_tls_failure(err: &reqwest::Error) -> bool {
    let mut source: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(current) = source {
        if current.downcast_ref::<rustls::Error>().is_some() {
            return true;
        }
        if let Some(io) = current.downcast_ref::<std::io::Error>() {
            if io
                .get_ref()
                .is_some_and(|inner| inner.downcast_ref::<rustls::Error>().is_some())
            {
                return true;
            }
        }
        if current.to_string().to_lowercase().contains("certificate") {
            return true;
        }
        source = current.source();
    }
    false
}

/// The innermost cause, which carries the useful text for connect and TLS errors.
fn describe(err: &reqwest::Error) -> String {
    let mut current: &(dyn StdError + 'static) = err;
    while let Some(next) = current.source() {
        current = next;
    }
    current.to_string()
}

/// Body text for a `Status` error; a failed read is reported in its place.
fn status_body<E: std::fmt::Display>(read: std::result::Result<String, E>) -> String {
    match read {
        Ok(body) => truncate(&body),
        Err(e) => {
            debug!(error = %e, "Failed to read error response body");
            truncate(&format!("<body unreadable: {e}>"))
        }
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
}
