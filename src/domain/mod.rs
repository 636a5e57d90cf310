//! Control-plane entities, held in memory for a single invocation.

mod deployment;
mod id;
mod project;
mod service;
mod variable;

pub use deployment::{Deployment, LogEntry, LogLevel};
pub use id::{DeploymentId, ProjectId, ServiceId};
pub use project::Project;
pub use service::{Service, ServiceDetail, ServiceKind, ServiceStatus};
pub use variable::{
    checklist, is_placeholder, is_sensitive, mask, CheckItem, CheckState, EnvVar, VariableSet,
};
