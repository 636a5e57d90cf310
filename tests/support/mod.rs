//! In-memory control plane for workflow tests that need state to persist
//! between calls, such as re-reading variables after a replacement.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use zeabur_ops::domain::{
    Deployment, DeploymentId, EnvVar, Project, ProjectId, Service, ServiceDetail, ServiceId,
    ServiceStatus, VariableSet,
};
use zeabur_ops::error::ApiError;
use zeabur_ops::port::ControlPlane;

#[derive(Default)]
struct State {
    projects: Vec<Project>,
    services: Vec<Service>,
    variables: HashMap<String, VariableSet>,
    deployments: HashMap<String, Vec<Deployment>>,
    mutations: Vec<String>,
}

#[derive(Default)]
pub struct InMemoryControlPlane {
    state: Mutex<State>,
}

impl InMemoryControlPlane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(self, id: &str, name: &str) -> Self {
        self.lock().projects.push(Project::new(id, name));
        self
    }

    pub fn with_service(self, id: &str, project: &str, name: &str, kind: &str) -> Self {
        self.lock()
            .services
            .push(Service::new(id, project, name, kind));
        self
    }

    pub fn with_variables(self, service: &str, vars: &[(&str, &str)]) -> Self {
        let set = VariableSet::from_remote(
            vars.iter()
                .map(|(name, value)| EnvVar::new(*name, *value))
                .collect(),
        );
        self.lock().variables.insert(service.to_string(), set);
        self
    }

    pub fn with_deployments(self, service: &str, items: &[(&str, &str)]) -> Self {
        let deployments = items
            .iter()
            .map(|(id, status)| Deployment::new(*id, service, *status))
            .collect();
        self.lock()
            .deployments
            .insert(service.to_string(), deployments);
        self
    }

    /// Mutations applied so far, as `operation:subject` strings.
    pub fn mutations(&self) -> Vec<String> {
        self.lock().mutations.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn not_found(operation: &'static str, service: &ServiceId) -> ApiError {
        ApiError::Decode {
            operation,
            reason: format!("service {service} not found"),
        }
    }
}

#[async_trait]
impl ControlPlane for InMemoryControlPlane {
    async fn ping(&self) -> Result<String, ApiError> {
        Ok("Query".into())
    }

    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        Ok(self.lock().projects.clone())
    }

    async fn list_services(&self, project: &ProjectId) -> Result<Vec<Service>, ApiError> {
        Ok(self
            .lock()
            .services
            .iter()
            .filter(|s| &s.project_id == project)
            .cloned()
            .collect())
    }

    async fn service_detail(&self, service: &ServiceId) -> Result<ServiceDetail, ApiError> {
        let state = self.lock();
        let found = state
            .services
            .iter()
            .find(|s| &s.id == service)
            .ok_or_else(|| Self::not_found("ServiceDetail", service))?;
        Ok(ServiceDetail {
            id: found.id.clone(),
            name: found.name.clone(),
            status: ServiceStatus::Running,
            deployments: state
                .deployments
                .get(service.as_str())
                .cloned()
                .unwrap_or_default(),
            variables: state
                .variables
                .get(service.as_str())
                .cloned()
                .unwrap_or_default(),
        })
    }

    async fn service_variables(&self, service: &ServiceId) -> Result<VariableSet, ApiError> {
        Ok(self
            .lock()
            .variables
            .get(service.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn deployments(&self, service: &ServiceId) -> Result<Vec<Deployment>, ApiError> {
        Ok(self
            .lock()
            .deployments
            .get(service.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn deployment_logs(&self, service: &ServiceId) -> Result<Option<Deployment>, ApiError> {
        Ok(self
            .lock()
            .deployments
            .get(service.as_str())
            .and_then(|d| d.first().cloned()))
    }

    async fn replace_variables(
        &self,
        _project: &ProjectId,
        service: &ServiceId,
        variables: &VariableSet,
    ) -> Result<(), ApiError> {
        let mut state = self.lock();
        state
            .variables
            .insert(service.to_string(), variables.clone());
        state.mutations.push(format!("replace:{service}"));
        Ok(())
    }

    async fn update_root_directory(
        &self,
        _project: &ProjectId,
        service: &ServiceId,
        root_directory: &str,
    ) -> Result<(), ApiError> {
        self.lock()
            .mutations
            .push(format!("root:{service}:{root_directory}"));
        Ok(())
    }

    async fn redeploy(&self, service: &ServiceId) -> Result<Option<DeploymentId>, ApiError> {
        let mut state = self.lock();
        state.mutations.push(format!("redeploy:{service}"));
        let id = format!("d-new-{}", state.mutations.len());
        state
            .deployments
            .entry(service.to_string())
            .or_default()
            .insert(0, Deployment::new(id.as_str(), service.as_str(), "PENDING"));
        Ok(Some(DeploymentId::new(id)))
    }

    async fn stop_deployment(&self, deployment: &DeploymentId) -> Result<(), ApiError> {
        self.lock().mutations.push(format!("stop:{deployment}"));
        Ok(())
    }
}
