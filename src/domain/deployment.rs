//! Deployments and their build/runtime log entries.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{DeploymentId, ServiceId};

/// Severity attached to a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
}

impl LogLevel {
    /// Parse a platform level tag. Unrecognized tags read as info.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "ERROR" | "FATAL" => Self::Error,
            "WARN" | "WARNING" => Self::Warn,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub content: String,
    /// Timestamp exactly as reported; formats vary between log sources.
    pub timestamp: String,
    pub level: Option<LogLevel>,
}

impl LogEntry {
    /// Effective severity, defaulting to info when absent.
    #[must_use]
    pub fn severity(&self) -> LogLevel {
        self.level.unwrap_or_default()
    }
}

/// One build/run attempt of a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub id: DeploymentId,
    pub service_id: ServiceId,
    /// Raw platform status; the set of values is open.
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub logs: Vec<LogEntry>,
}

impl Deployment {
    pub fn new(
        id: impl Into<DeploymentId>,
        service_id: impl Into<ServiceId>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            service_id: service_id.into(),
            status: status.into(),
            created_at: None,
            updated_at: None,
            logs: Vec::new(),
        }
    }

    /// True when the status textually indicates a live deployment:
    /// it contains `running` or equals `active` (case-insensitive).
    #[must_use]
    pub fn is_running_like(&self) -> bool {
        let status = self.status.to_lowercase();
        status.contains("running") || status == "active"
    }

    /// The last `n` log entries, oldest first.
    #[must_use]
    pub fn log_tail(&self, n: usize) -> &[LogEntry] {
        let start = self.logs.len().saturating_sub(n);
        &self.logs[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deployment(status: &str) -> Deployment {
        Deployment::new("d-1", "s-1", status)
    }

    #[test]
    fn running_like_statuses() {
        assert!(deployment("RUNNING").is_running_like());
        assert!(deployment("running_healthy").is_running_like());
        assert!(deployment("Active").is_running_like());
        assert!(!deployment("INACTIVE").is_running_like());
        assert!(!deployment("REMOVED").is_running_like());
        assert!(!deployment("").is_running_like());
    }

    #[test]
    fn log_tail_takes_most_recent_entries() {
        let mut d = deployment("RUNNING");
        d.logs = (0..5)
            .map(|i| LogEntry {
                content: format!("line {i}"),
                timestamp: i.to_string(),
                level: None,
            })
            .collect();

        let tail = d.log_tail(2);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].content, "line 3");
        assert_eq!(d.log_tail(10).len(), 5);
    }

    #[test]
    fn level_parsing_defaults_to_info() {
        assert_eq!(LogLevel::parse("error"), LogLevel::Error);
        assert_eq!(LogLevel::parse("WARNING"), LogLevel::Warn);
        assert_eq!(LogLevel::parse("debug"), LogLevel::Info);
    }
}
