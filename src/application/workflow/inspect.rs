//! Inspect: service status, deployment history, variable checklist, log tail.

use tracing::{debug, warn};

use super::{resolve_target, Target};
use crate::domain::{
    checklist, CheckItem, DeploymentId, LogEntry, ServiceDetail, ServiceStatus,
};
use crate::error::Result;
use crate::infrastructure::config::inspect::InspectConfig;
use crate::infrastructure::config::target::TargetConfig;
use crate::port::ControlPlane;

/// What the log fetch produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogsOutcome {
    /// Not requested.
    Skipped,
    /// The service has never been deployed.
    NoDeployments,
    /// The last entries of the latest deployment's log, oldest first.
    Entries {
        deployment: DeploymentId,
        total: usize,
        tail: Vec<LogEntry>,
    },
    /// The fetch failed; the rest of the report is still valid.
    Unavailable(String),
}

/// Operator guidance derived from the service status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Running,
    Building,
    /// Failed, with the required variables that are missing or placeholders.
    Failed { unsatisfied: Vec<String> },
    Other(ServiceStatus),
}

impl Verdict {
    #[must_use]
    pub fn classify(status: &ServiceStatus, checklist: &[CheckItem]) -> Self {
        match status {
            ServiceStatus::Running => Self::Running,
            ServiceStatus::Building => Self::Building,
            ServiceStatus::Failed => Self::Failed {
                unsatisfied: checklist
                    .iter()
                    .filter(|item| !item.is_satisfied())
                    .map(|item| item.name.clone())
                    .collect(),
            },
            other => Self::Other(other.clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InspectReport {
    pub target: Target,
    pub detail: ServiceDetail,
    pub checklist: Vec<CheckItem>,
    pub logs: LogsOutcome,
    pub verdict: Verdict,
}

impl InspectReport {
    /// True when every required variable is present with a real value.
    #[must_use]
    pub fn checklist_satisfied(&self) -> bool {
        self.checklist.iter().all(CheckItem::is_satisfied)
    }
}

/// Resolve the target, fetch its detail, and optionally its latest logs.
///
/// A failed log fetch is reported in the result rather than failing the run.
pub async fn inspect<C>(
    control: &C,
    target: &TargetConfig,
    settings: &InspectConfig,
    fetch_logs: bool,
) -> Result<InspectReport>
where
    C: ControlPlane + ?Sized,
{
    let resolved = resolve_target(control, target).await?;
    let detail = control.service_detail(&resolved.service.id).await?;
    debug!(
        deployments = detail.deployments.len(),
        variables = detail.variables.len(),
        "Fetched service detail"
    );

    let checklist = checklist(
        &detail.variables,
        &settings.required,
        &settings.placeholder_markers,
    );
    let verdict = Verdict::classify(&detail.status, &checklist);

    let logs = if fetch_logs {
        match control.deployment_logs(&resolved.service.id).await {
            Ok(Some(latest)) => LogsOutcome::Entries {
                total: latest.logs.len(),
                tail: latest.log_tail(settings.log_tail).to_vec(),
                deployment: latest.id,
            },
            Ok(None) => LogsOutcome::NoDeployments,
            Err(err) => {
                warn!(error = %err, "Could not fetch deployment logs");
                LogsOutcome::Unavailable(err.to_string())
            }
        }
    } else {
        LogsOutcome::Skipped
    };

    Ok(InspectReport {
        target: resolved,
        detail,
        checklist,
        logs,
        verdict,
    })
}
