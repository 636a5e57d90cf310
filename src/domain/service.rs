//! Services and their declared type and status.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::deployment::Deployment;
use super::id::{ProjectId, ServiceId};
use super::variable::VariableSet;

/// Declared service type. The platform's set is open; unknown tags are kept
/// uppercased so they compare case-insensitively like the known ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ServiceKind {
    Dockerfile,
    Docker,
    Nodejs,
    Postgres,
    Other(String),
}

impl ServiceKind {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Dockerfile => "DOCKERFILE",
            Self::Docker => "DOCKER",
            Self::Nodejs => "NODEJS",
            Self::Postgres => "POSTGRES",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for ServiceKind {
    fn from(tag: String) -> Self {
        let tag = tag.to_ascii_uppercase();
        match tag.as_str() {
            "DOCKERFILE" => Self::Dockerfile,
            "DOCKER" => Self::Docker,
            "NODEJS" => Self::Nodejs,
            "POSTGRES" | "POSTGRESQL" => Self::Postgres,
            _ => Self::Other(tag),
        }
    }
}

impl From<&str> for ServiceKind {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_string())
    }
}

impl From<ServiceKind> for String {
    fn from(kind: ServiceKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current service status as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ServiceStatus {
    Running,
    Building,
    /// `FAILED` or `ERROR`.
    Failed,
    Other(String),
    #[default]
    Unknown,
}

impl ServiceStatus {
    /// Parse an optional raw status; absence maps to [`ServiceStatus::Unknown`].
    #[must_use]
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            None => Self::Unknown,
            Some(s) if s.trim().is_empty() => Self::Unknown,
            Some(s) => Self::from(s.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Running => "RUNNING",
            Self::Building => "BUILDING",
            Self::Failed => "FAILED",
            Self::Other(raw) => raw,
            Self::Unknown => "unknown",
        }
    }
}

impl From<String> for ServiceStatus {
    fn from(raw: String) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "RUNNING" => Self::Running,
            "BUILDING" => Self::Building,
            "FAILED" | "ERROR" => Self::Failed,
            "UNKNOWN" | "" => Self::Unknown,
            _ => Self::Other(raw),
        }
    }
}

impl From<ServiceStatus> for String {
    fn from(status: ServiceStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A deployable unit inside a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub project_id: ProjectId,
    pub name: String,
    pub kind: ServiceKind,
    pub status: ServiceStatus,
    pub created_at: Option<DateTime<Utc>>,
}

impl Service {
    pub fn new(
        id: impl Into<ServiceId>,
        project_id: impl Into<ProjectId>,
        name: impl Into<String>,
        kind: impl Into<ServiceKind>,
    ) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            name: name.into(),
            kind: kind.into(),
            status: ServiceStatus::Unknown,
            created_at: None,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: ServiceStatus) -> Self {
        self.status = status;
        self
    }
}

/// A service's status, deployment history (newest first), and variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDetail {
    pub id: ServiceId,
    pub name: String,
    pub status: ServiceStatus,
    pub deployments: Vec<Deployment>,
    pub variables: VariableSet,
}
