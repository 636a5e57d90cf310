//! Configure-and-deploy.
//!
//! Planning resolves every secret first, so a missing one fails the run
//! before any network call. It then discovers the target and the database
//! connection string. Applying optionally sets the build root directory,
//! replaces the full variable set in one call, and triggers a redeploy.

use tracing::{info, warn};

use super::{resolve_target, Target};
use crate::application::resolver::{select_database_service, Resolution};
use crate::domain::{DeploymentId, EnvVar, Service, VariableSet};
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::Config;
use crate::port::ControlPlane;

/// Where the database URL in the plan came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseSource {
    /// The variable table defines it directly.
    Table,
    /// Copied from the managed database service.
    Service { name: String },
    /// No usable value was found; the configured placeholder was used.
    Placeholder { reason: String },
}

impl DatabaseSource {
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }
}

#[derive(Debug, Clone)]
pub struct DeployPlan {
    pub target: Target,
    /// The complete set that will replace the service's variables.
    pub variables: VariableSet,
    pub database: DatabaseSource,
    pub root_directory: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOutcome {
    pub root_directory_set: bool,
    pub variables_applied: usize,
    /// New deployment id, when the platform reported one.
    pub deployment: Option<DeploymentId>,
}

/// Resolve secrets, discover the target, and assemble the variable set.
///
/// # Errors
///
/// A [`ConfigError::MissingSecret`] before any network call when a required
/// secret is unset; resolution and API errors afterwards.
pub async fn plan<C, F>(control: &C, config: &Config, lookup: F) -> Result<DeployPlan>
where
    C: ControlPlane + ?Sized,
    F: Fn(&str) -> Option<String>,
{
    let table = config.deploy.resolve_variables(lookup)?;
    let target = resolve_target(control, &config.target).await?;

    let url_var = config.target.database_url_var.as_str();
    let (database_url, database) = if config.deploy.defines(url_var) {
        (None, DatabaseSource::Table)
    } else {
        let (url, source) = lookup_database_url(control, config, &target.services).await?;
        (Some(url), source)
    };

    let mut vars = Vec::with_capacity(table.len() + 1);
    if let Some(url) = database_url {
        vars.push(EnvVar::new(url_var, url));
    }
    vars.extend(table);
    let variables = VariableSet::new(vars).map_err(|name| ConfigError::InvalidValue {
        field: "variables",
        reason: format!("duplicate variable {name}"),
    })?;

    Ok(DeployPlan {
        target,
        variables,
        database,
        root_directory: config.deploy.root_directory.clone(),
    })
}

/// Look up the database service's connection string, or fall back to the placeholder.
async fn lookup_database_url<C>(
    control: &C,
    config: &Config,
    services: &[Service],
) -> Result<(String, DatabaseSource)>
where
    C: ControlPlane + ?Sized,
{
    let url_var = config.target.database_url_var.as_str();
    let placeholder = |reason: String| -> Result<(String, DatabaseSource)> {
        warn!(reason = %reason, "Using placeholder database URL; set it manually after deploy");
        Ok((
            config.deploy.database_placeholder.clone(),
            DatabaseSource::Placeholder { reason },
        ))
    };

    let database = match select_database_service(services, &config.target.database_kind()) {
        Resolution::Exact(service) | Resolution::Fallback(service) => service,
        Resolution::NotFound => {
            return placeholder(format!(
                "no {} service in project",
                config.target.database_type
            ))
        }
    };

    let variables = control.service_variables(&database.id).await?;
    match variables.get(url_var).filter(|v| !v.trim().is_empty()) {
        Some(url) => {
            info!(service = %database.name, "Using database URL from database service");
            Ok((
                url.to_string(),
                DatabaseSource::Service {
                    name: database.name.clone(),
                },
            ))
        }
        None => placeholder(format!("{} has no {url_var}", database.name)),
    }
}

/// Apply a plan: root directory, full variable replacement, redeploy.
pub async fn apply<C>(control: &C, plan: &DeployPlan) -> Result<DeployOutcome>
where
    C: ControlPlane + ?Sized,
{
    let project = &plan.target.project.id;
    let service = &plan.target.service.id;

    let root_directory_set = match &plan.root_directory {
        Some(dir) => {
            control.update_root_directory(project, service, dir).await?;
            info!(root_directory = %dir, "Root directory updated");
            true
        }
        None => false,
    };

    control
        .replace_variables(project, service, &plan.variables)
        .await?;
    info!(count = plan.variables.len(), "Variables replaced");

    let deployment = control.redeploy(service).await?;
    info!(service = %service, "Redeploy triggered");

    Ok(DeployOutcome {
        root_directory_set,
        variables_applied: plan.variables.len(),
        deployment,
    })
}
