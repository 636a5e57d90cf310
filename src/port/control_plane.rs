//! Typed control-plane operations.
//!
//! Workflows depend on this trait rather than on GraphQL documents, so they
//! can be exercised against any implementation. Every method is one logical
//! call: retries happen underneath it, never across it.

use async_trait::async_trait;

use crate::domain::{
    Deployment, DeploymentId, Project, ProjectId, Service, ServiceDetail, ServiceId, VariableSet,
};
use crate::error::ApiError;

#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// Cheapest possible round-trip; returns the root type name.
    async fn ping(&self) -> Result<String, ApiError>;

    /// All projects visible to the credential, in platform order.
    async fn list_projects(&self) -> Result<Vec<Project>, ApiError>;

    /// Services of one project, in platform order.
    async fn list_services(&self, project: &ProjectId) -> Result<Vec<Service>, ApiError>;

    /// Status, deployment history (newest first), and variables.
    async fn service_detail(&self, service: &ServiceId) -> Result<ServiceDetail, ApiError>;

    async fn service_variables(&self, service: &ServiceId) -> Result<VariableSet, ApiError>;

    /// Deployment history, newest first.
    async fn deployments(&self, service: &ServiceId) -> Result<Vec<Deployment>, ApiError>;

    /// The latest deployment with its log entries, if the service has one.
    async fn deployment_logs(&self, service: &ServiceId) -> Result<Option<Deployment>, ApiError>;

    /// Replace the service's full variable set in one call.
    async fn replace_variables(
        &self,
        project: &ProjectId,
        service: &ServiceId,
        variables: &VariableSet,
    ) -> Result<(), ApiError>;

    async fn update_root_directory(
        &self,
        project: &ProjectId,
        service: &ServiceId,
        root_directory: &str,
    ) -> Result<(), ApiError>;

    /// Trigger a redeploy. Returns the new deployment id when the platform reports one.
    async fn redeploy(&self, service: &ServiceId) -> Result<Option<DeploymentId>, ApiError>;

    async fn stop_deployment(&self, deployment: &DeploymentId) -> Result<(), ApiError>;
}
