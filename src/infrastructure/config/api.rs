//! Control-plane endpoint, credential, timeout, and retry settings.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::application::retry::RetryPolicy;

/// Environment variables consulted for the bearer credential, in order.
pub const TOKEN_ENV_VARS: [&str; 2] = ["ZEABUR_API_KEY", "ZEABUR_TOKEN"];

/// Secret material loaded from the environment at runtime.
///
/// `Debug` and `Display` never reveal the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw value. Only the transport should call this.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// GraphQL API configuration.
///
/// The bearer token is loaded from `ZEABUR_API_KEY` (or `ZEABUR_TOKEN`) at
/// runtime, never from the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// GraphQL endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// TCP/TLS connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Per-read timeout in milliseconds.
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
    /// Network round-trips allowed per logical call.
    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: u32,
    /// Delay before the second attempt; doubles for each later attempt.
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    /// Allow one attempt without certificate verification after a TLS failure.
    #[serde(default)]
    pub allow_insecure_tls_fallback: bool,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(skip)]
    pub token: Option<Secret>,
}

fn default_endpoint() -> String {
    "https://gateway.zeabur.com/graphql".into()
}

const fn default_connect_timeout_ms() -> u64 {
    10_000
}

const fn default_read_timeout_ms() -> u64 {
    30_000
}

const fn default_retry_max_attempts() -> u32 {
    5
}

const fn default_retry_base_delay_ms() -> u64 {
    1_000
}

fn default_user_agent() -> String {
    concat!("zeabur-ops/", env!("CARGO_PKG_VERSION")).into()
}

impl ApiConfig {
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_max_attempts,
            Duration::from_millis(self.retry_base_delay_ms),
        )
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            connect_timeout_ms: default_connect_timeout_ms(),
            read_timeout_ms: default_read_timeout_ms(),
            retry_max_attempts: default_retry_max_attempts(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            allow_insecure_tls_fallback: false,
            user_agent: default_user_agent(),
            token: None,
        }
    }
}
