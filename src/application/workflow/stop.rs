//! Stop every running deployment of the application service.
//!
//! Each stop is its own logical call. A failure is logged and recorded,
//! and the batch moves on to the next deployment.

use tracing::{info, warn};

use super::{resolve_target, Target};
use crate::domain::{Deployment, DeploymentId};
use crate::error::Result;
use crate::infrastructure::config::target::TargetConfig;
use crate::port::ControlPlane;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopAttempt {
    pub deployment: DeploymentId,
    pub status: String,
    /// `None` when stopped, otherwise the failure text.
    pub error: Option<String>,
}

impl StopAttempt {
    #[must_use]
    pub fn stopped(&self) -> bool {
        self.error.is_none()
    }
}

/// How the batch went as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopSummary {
    /// Nothing was running.
    NothingToStop,
    AllStopped,
    Partial,
    /// Every attempt failed.
    NoneStopped,
}

#[derive(Debug, Clone)]
pub struct StopReport {
    pub target: Target,
    /// Deployments seen in the history.
    pub total: usize,
    pub attempts: Vec<StopAttempt>,
}

impl StopReport {
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.attempts.len()
    }

    #[must_use]
    pub fn stopped(&self) -> usize {
        self.attempts.iter().filter(|a| a.stopped()).count()
    }

    #[must_use]
    pub fn summary(&self) -> StopSummary {
        match (self.attempted(), self.stopped()) {
            (0, _) => StopSummary::NothingToStop,
            (_, 0) => StopSummary::NoneStopped,
            (attempted, stopped) if attempted == stopped => StopSummary::AllStopped,
            _ => StopSummary::Partial,
        }
    }
}

/// Deployments whose status reads as live.
#[must_use]
pub fn running(deployments: &[Deployment]) -> Vec<&Deployment> {
    deployments.iter().filter(|d| d.is_running_like()).collect()
}

pub async fn stop_all<C>(control: &C, target: &TargetConfig) -> Result<StopReport>
where
    C: ControlPlane + ?Sized,
{
    let resolved = resolve_target(control, target).await?;
    let deployments = control.deployments(&resolved.service.id).await?;
    let live = running(&deployments);
    info!(
        total = deployments.len(),
        running = live.len(),
        "Fetched deployments"
    );

    let mut attempts = Vec::with_capacity(live.len());
    for deployment in live {
        let error = match control.stop_deployment(&deployment.id).await {
            Ok(()) => {
                info!(deployment = %deployment.id.short(), "Deployment stopped");
                None
            }
            Err(err) => {
                warn!(deployment = %deployment.id.short(), error = %err, "Failed to stop deployment");
                Some(err.to_string())
            }
        };
        attempts.push(StopAttempt {
            deployment: deployment.id.clone(),
            status: deployment.status.clone(),
            error,
        });
    }

    Ok(StopReport {
        target: resolved,
        total: deployments.len(),
        attempts,
    })
}
