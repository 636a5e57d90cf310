//! End-to-end operations composed from resolver steps and control-plane calls.
//!
//! Every workflow starts from [`resolve_target`], which discovers the
//! project and the application service. Fallback selections are logged and
//! carried in the [`Target`] so reports can flag them.

pub mod check;
pub mod deploy;
pub mod inspect;
pub mod redeploy;
pub mod stop;

use tracing::{info, warn};

use super::resolver::{select_app_service, select_project, Resolved};
use crate::domain::{Project, Service};
use crate::error::{ResolveError, Result};
use crate::infrastructure::config::target::TargetConfig;
use crate::port::ControlPlane;

/// The discovered topology and the entities selected from it.
#[derive(Debug, Clone)]
pub struct Target {
    pub projects: Vec<Project>,
    pub project: Resolved<Project>,
    /// Every service of the selected project, in platform order.
    pub services: Vec<Service>,
    pub service: Resolved<Service>,
}

impl Target {
    /// True when either selection fell back to the first candidate.
    #[must_use]
    pub fn used_fallback(&self) -> bool {
        self.project.is_fallback() || self.service.is_fallback()
    }
}

/// Resolve the active project, then the application service inside it.
///
/// # Errors
///
/// [`ResolveError::NoProjects`] or [`ResolveError::NoServices`] when a
/// discovery list is empty; API errors from either listing call.
pub async fn resolve_target<C>(control: &C, target: &TargetConfig) -> Result<Target>
where
    C: ControlPlane + ?Sized,
{
    let projects = control.list_projects().await?;
    let project = select_project(&projects, &target.project, target.project_match)
        .map(Clone::clone)
        .into_resolved()
        .ok_or(ResolveError::NoProjects)?;
    if project.is_fallback() {
        warn!(
            target = %target.project,
            selected = %project.name,
            "Project not found by name, using first project"
        );
    } else {
        info!(project = %project.name, id = %project.id, "Selected project");
    }

    let services = control.list_services(&project.id).await?;
    let service = select_app_service(&services, &target.app_criteria())
        .map(Clone::clone)
        .into_resolved()
        .ok_or_else(|| ResolveError::NoServices {
            project: project.name.clone(),
        })?;
    if service.is_fallback() {
        warn!(
            fragment = %target.service,
            selected = %service.name,
            "No application service matched, using first service"
        );
    } else {
        info!(service = %service.name, id = %service.id, "Selected service");
    }

    Ok(Target {
        projects,
        project,
        services,
        service,
    })
}
