//! Which project and services the workflows act on.

use serde::Deserialize;

use crate::application::resolver::{MatchMode, ServiceCriteria};
use crate::domain::ServiceKind;

/// Target selection heuristics.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    /// Project name to look for (case-insensitive).
    #[serde(default = "default_project")]
    pub project: String,
    /// How `project` is compared against project names.
    #[serde(default)]
    pub project_match: MatchMode,
    /// Name fragment identifying the application service.
    #[serde(default = "default_service")]
    pub service: String,
    /// Service types that count as application services.
    #[serde(default = "default_app_types")]
    pub app_types: Vec<String>,
    /// Service type of the managed database.
    #[serde(default = "default_database_type")]
    pub database_type: String,
    /// Variable on the database service holding its connection string.
    #[serde(default = "default_database_url_var")]
    pub database_url_var: String,
}

fn default_project() -> String {
    "xhs".into()
}

fn default_service() -> String {
    "content-generator".into()
}

fn default_app_types() -> Vec<String> {
    vec!["DOCKERFILE".into(), "NODEJS".into(), "DOCKER".into()]
}

fn default_database_type() -> String {
    "POSTGRES".into()
}

fn default_database_url_var() -> String {
    "DATABASE_URL".into()
}

impl TargetConfig {
    /// Criteria for the application service role.
    #[must_use]
    pub fn app_criteria(&self) -> ServiceCriteria {
        ServiceCriteria {
            name_fragment: self.service.clone(),
            kinds: self
                .app_types
                .iter()
                .map(|t| ServiceKind::from(t.as_str()))
                .collect(),
        }
    }

    #[must_use]
    pub fn database_kind(&self) -> ServiceKind {
        ServiceKind::from(self.database_type.as_str())
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            project: default_project(),
            project_match: MatchMode::default(),
            service: default_service(),
            app_types: default_app_types(),
            database_type: default_database_type(),
            database_url_var: default_database_url_var(),
        }
    }
}
