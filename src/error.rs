use thiserror::Error;

use crate::port::transport::{GraphqlError, TransportError};

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("missing secret: environment variable {name} is not set")]
    MissingSecret { name: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Control-plane call failures surfaced after the retry budget is spent.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The endpoint answered, but with a GraphQL `errors` list on every attempt.
    #[error("GraphQL error after {attempts} attempt(s): {}", summarize(.errors))]
    Graphql {
        attempts: u32,
        errors: Vec<GraphqlError>,
    },

    /// Every attempt failed at the transport level.
    #[error("request failed after {attempts} attempt(s): {last}")]
    Exhausted { attempts: u32, last: TransportError },

    /// The call succeeded but `data` did not have the expected shape.
    #[error("unexpected response shape for {operation}: {reason}")]
    Decode {
        operation: &'static str,
        reason: String,
    },
}

fn summarize(errors: &[GraphqlError]) -> String {
    if errors.is_empty() {
        return "empty error list".to_string();
    }
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Entity resolution failures. Fallback selections are not errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no project found")]
    NoProjects,

    #[error("no services found in project {project}")]
    NoServices { project: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True when the failure happened before any network call was made.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
