//! Trigger a redeploy of the application service.
//!
//! The platform stops the previous deployment itself, so this is a single
//! mutation after resolution.

use tracing::info;

use super::{resolve_target, Target};
use crate::domain::DeploymentId;
use crate::error::Result;
use crate::infrastructure::config::target::TargetConfig;
use crate::port::ControlPlane;

#[derive(Debug, Clone)]
pub struct RedeployReport {
    pub target: Target,
    pub deployment: Option<DeploymentId>,
}

pub async fn redeploy<C>(control: &C, target: &TargetConfig) -> Result<RedeployReport>
where
    C: ControlPlane + ?Sized,
{
    let resolved = resolve_target(control, target).await?;
    let deployment = control.redeploy(&resolved.service.id).await?;
    info!(
        service = %resolved.service.name,
        deployment = deployment.as_ref().map_or("unknown", DeploymentId::as_str),
        "Redeploy triggered"
    );
    Ok(RedeployReport {
        target: resolved,
        deployment,
    })
}
