//! Wire shapes of Zeabur `data` payloads and their conversion to domain types.
//!
//! The API may send `null` for any list or scalar, so everything optional
//! on the wire is `Option` here; conversion fills in empty defaults.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{
    Deployment, EnvVar, LogEntry, LogLevel, Project, Service, ServiceDetail, ServiceId,
    ServiceKind, ServiceStatus, VariableSet,
};

#[derive(Debug, Deserialize)]
pub struct ProjectsData {
    #[serde(default)]
    pub projects: Option<Vec<ProjectDto>>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectDto {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl From<ProjectDto> for Project {
    fn from(dto: ProjectDto) -> Self {
        Project::new(dto.id, dto.name.unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
pub struct ProjectServicesData {
    #[serde(default)]
    pub project: Option<ProjectServicesDto>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectServicesDto {
    #[serde(default)]
    pub services: Option<Vec<ServiceDto>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDto {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl ServiceDto {
    pub fn into_service(self, project_id: &crate::domain::ProjectId) -> Service {
        let mut service = Service::new(
            self.id,
            project_id.clone(),
            self.name.unwrap_or_default(),
            ServiceKind::from(self.kind.unwrap_or_default()),
        )
        .with_status(ServiceStatus::from_raw(self.status.as_deref()));
        service.created_at = parse_time(self.created_at.as_deref());
        service
    }
}

/// `{ service: ... }`, shared by every per-service query.
#[derive(Debug, Deserialize)]
pub struct ServiceData {
    #[serde(default)]
    pub service: Option<ServiceDetailDto>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ServiceDetailDto {
    #[serde(default, rename = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub deployments: Option<Vec<DeploymentDto>>,
    #[serde(default)]
    pub env: Option<Vec<EnvDto>>,
}

impl ServiceDetailDto {
    pub fn into_detail(self, requested: &ServiceId) -> ServiceDetail {
        let id = self.id.map_or_else(|| requested.clone(), ServiceId::from);
        ServiceDetail {
            status: ServiceStatus::from_raw(self.status.as_deref()),
            name: self.name.unwrap_or_default(),
            deployments: into_deployments(self.deployments, &id),
            variables: into_variables(self.env),
            id,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentDto {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub logs: Option<Vec<LogDto>>,
}

impl DeploymentDto {
    pub fn into_deployment(self, service_id: &ServiceId) -> Deployment {
        let mut deployment =
            Deployment::new(self.id, service_id.clone(), self.status.unwrap_or_default());
        deployment.created_at = parse_time(self.created_at.as_deref());
        deployment.updated_at = parse_time(self.updated_at.as_deref());
        deployment.logs = self
            .logs
            .unwrap_or_default()
            .into_iter()
            .map(LogEntry::from)
            .collect();
        deployment
    }
}

#[derive(Debug, Deserialize)]
pub struct LogDto {
    #[serde(default)]
    pub content: Option<String>,
    /// String or epoch number depending on the log source.
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(default)]
    pub level: Option<String>,
}

impl From<LogDto> for LogEntry {
    fn from(dto: LogDto) -> Self {
        let timestamp = match dto.timestamp {
            Some(Value::String(s)) => s,
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        LogEntry {
            content: dto.content.unwrap_or_default(),
            timestamp,
            level: dto.level.as_deref().map(LogLevel::parse),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EnvDto {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// `{ redeployService: { _id, status } }`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeployData {
    #[serde(default)]
    pub redeploy_service: Option<DeploymentRef>,
}

/// `{ stopDeployment: { _id, status } }`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopData {
    #[serde(default)]
    pub stop_deployment: Option<DeploymentRef>,
}

#[derive(Debug, Deserialize)]
pub struct DeploymentRef {
    #[serde(default, rename = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

pub fn into_deployments(dtos: Option<Vec<DeploymentDto>>, service_id: &ServiceId) -> Vec<Deployment> {
    dtos.unwrap_or_default()
        .into_iter()
        .map(|dto| dto.into_deployment(service_id))
        .collect()
}

pub fn into_variables(dtos: Option<Vec<EnvDto>>) -> VariableSet {
    VariableSet::from_remote(
        dtos.unwrap_or_default()
            .into_iter()
            .map(|dto| EnvVar::new(dto.name, dto.value.unwrap_or_default()))
            .collect(),
    )
}

/// RFC 3339 timestamps; anything else is dropped.
fn parse_time(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc))
}
