//! Typed Zeabur client.
//!
//! Builds requests from the documents in [`super::query`], runs them through a
//! [`ResilientClient`], and decodes `data` into domain types.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

use super::dto::{
    into_deployments, into_variables, ProjectServicesData, ProjectsData, RedeployData,
    ServiceData, StopData,
};
use super::query;
use crate::application::resilient::ResilientClient;
use crate::domain::{
    Deployment, DeploymentId, Project, ProjectId, Service, ServiceDetail, ServiceId, VariableSet,
};
use crate::error::ApiError;
use crate::port::{ControlPlane, GraphqlRequest, Transport};

pub struct ZeaburClient<T> {
    api: ResilientClient<T>,
}

impl<T: Transport> ZeaburClient<T> {
    pub fn new(api: ResilientClient<T>) -> Self {
        Self { api }
    }

    #[must_use]
    pub fn api(&self) -> &ResilientClient<T> {
        &self.api
    }

    async fn fetch<D: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: GraphqlRequest,
    ) -> Result<D, ApiError> {
        let data = self.api.execute(&request).await?;
        decode(operation, data)
    }

    async fn service(
        &self,
        operation: &'static str,
        document: &str,
        service: &ServiceId,
    ) -> Result<super::dto::ServiceDetailDto, ApiError> {
        let request = GraphqlRequest::new(document).var("serviceId", service.as_str());
        let data: ServiceData = self.fetch(operation, request).await?;
        data.service.ok_or_else(|| ApiError::Decode {
            operation,
            reason: format!("service {service} not found"),
        })
    }
}

fn decode<D: DeserializeOwned>(operation: &'static str, data: Value) -> Result<D, ApiError> {
    if data.is_null() {
        return Err(ApiError::Decode {
            operation,
            reason: "response has no data".into(),
        });
    }
    serde_json::from_value(data).map_err(|e| ApiError::Decode {
        operation,
        reason: e.to_string(),
    })
}

#[async_trait]
impl<T: Transport> ControlPlane for ZeaburClient<T> {
    async fn ping(&self) -> Result<String, ApiError> {
        let data = self.api.execute(&GraphqlRequest::new(query::PING)).await?;
        Ok(data
            .get("__typename")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }

    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        let data: ProjectsData = self
            .fetch("Projects", GraphqlRequest::new(query::PROJECTS))
            .await?;
        let projects: Vec<Project> = data
            .projects
            .unwrap_or_default()
            .into_iter()
            .map(Project::from)
            .collect();
        debug!(count = projects.len(), "Fetched projects");
        Ok(projects)
    }

    async fn list_services(&self, project: &ProjectId) -> Result<Vec<Service>, ApiError> {
        let request =
            GraphqlRequest::new(query::PROJECT_SERVICES).var("projectId", project.as_str());
        let data: ProjectServicesData = self.fetch("ProjectServices", request).await?;
        let services: Vec<Service> = data
            .project
            .and_then(|p| p.services)
            .unwrap_or_default()
            .into_iter()
            .map(|dto| dto.into_service(project))
            .collect();
        debug!(project = %project, count = services.len(), "Fetched services");
        Ok(services)
    }

    async fn service_detail(&self, service: &ServiceId) -> Result<ServiceDetail, ApiError> {
        let dto = self
            .service("ServiceDetail", query::SERVICE_DETAIL, service)
            .await?;
        Ok(dto.into_detail(service))
    }

    async fn service_variables(&self, service: &ServiceId) -> Result<VariableSet, ApiError> {
        let dto = self
            .service("ServiceVariables", query::SERVICE_VARIABLES, service)
            .await?;
        Ok(into_variables(dto.env))
    }

    async fn deployments(&self, service: &ServiceId) -> Result<Vec<Deployment>, ApiError> {
        let dto = self
            .service("ServiceDeployments", query::SERVICE_DEPLOYMENTS, service)
            .await?;
        Ok(into_deployments(dto.deployments, service))
    }

    async fn deployment_logs(&self, service: &ServiceId) -> Result<Option<Deployment>, ApiError> {
        let dto = self
            .service("DeploymentLogs", query::DEPLOYMENT_LOGS, service)
            .await?;
        Ok(into_deployments(dto.deployments, service).into_iter().next())
    }

    async fn replace_variables(
        &self,
        project: &ProjectId,
        service: &ServiceId,
        variables: &VariableSet,
    ) -> Result<(), ApiError> {
        let envs: Vec<Value> = variables
            .iter()
            .map(|var| json!({ "name": var.name, "value": var.value }))
            .collect();
        let request = GraphqlRequest::new(query::REPLACE_VARIABLES)
            .var("projectId", project.as_str())
            .var("serviceId", service.as_str())
            .var("envs", envs);
        self.api.execute(&request).await?;
        debug!(service = %service, count = variables.len(), "Replaced variables");
        Ok(())
    }

    async fn update_root_directory(
        &self,
        project: &ProjectId,
        service: &ServiceId,
        root_directory: &str,
    ) -> Result<(), ApiError> {
        let request = GraphqlRequest::new(query::UPDATE_ROOT_DIRECTORY)
            .var("projectId", project.as_str())
            .var("serviceId", service.as_str())
            .var("rootDirectory", root_directory);
        self.api.execute(&request).await?;
        Ok(())
    }

    async fn redeploy(&self, service: &ServiceId) -> Result<Option<DeploymentId>, ApiError> {
        let request =
            GraphqlRequest::new(query::REDEPLOY_SERVICE).var("serviceId", service.as_str());
        let data = self.api.execute(&request).await?;
        if data.is_null() {
            return Ok(None);
        }
        let data: RedeployData = decode("RedeployService", data)?;
        Ok(data
            .redeploy_service
            .and_then(|d| d.id)
            .map(DeploymentId::from))
    }

    async fn stop_deployment(&self, deployment: &DeploymentId) -> Result<(), ApiError> {
        let request =
            GraphqlRequest::new(query::STOP_DEPLOYMENT).var("deploymentId", deployment.as_str());
        let data = self.api.execute(&request).await?;
        if !data.is_null() {
            let data: StopData = decode("StopDeployment", data)?;
            if let Some(status) = data.stop_deployment.and_then(|d| d.status) {
                debug!(deployment = %deployment, status = %status, "Deployment stop acknowledged");
            }
        }
        Ok(())
    }
}
