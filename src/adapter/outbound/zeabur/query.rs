//! GraphQL documents for the Zeabur control plane.
//!
//! Every document is named so calls can be told apart in logs and tests.

pub const PING: &str = "query Ping { __typename }";

pub const PROJECTS: &str = r"query Projects {
  projects {
    _id
    name
    createdAt
  }
}";

pub const PROJECT_SERVICES: &str = r"query ProjectServices($projectId: ObjectID!) {
  project(_id: $projectId) {
    services {
      _id
      name
      type
      status
      createdAt
    }
  }
}";

pub const SERVICE_DETAIL: &str = r"query ServiceDetail($serviceId: ObjectID!) {
  service(_id: $serviceId) {
    _id
    name
    status
    deployments {
      _id
      status
      createdAt
      updatedAt
    }
    env {
      name
      value
    }
  }
}";

pub const SERVICE_VARIABLES: &str = r"query ServiceVariables($serviceId: ObjectID!) {
  service(_id: $serviceId) {
    env {
      name
      value
    }
  }
}";

pub const SERVICE_DEPLOYMENTS: &str = r"query ServiceDeployments($serviceId: ObjectID!) {
  service(_id: $serviceId) {
    deployments {
      _id
      status
      createdAt
      updatedAt
    }
  }
}";

pub const DEPLOYMENT_LOGS: &str = r"query DeploymentLogs($serviceId: ObjectID!) {
  service(_id: $serviceId) {
    deployments {
      _id
      status
      logs {
        content
        timestamp
        level
      }
    }
  }
}";

pub const REPLACE_VARIABLES: &str = r"mutation ReplaceVariables($projectId: ObjectID!, $serviceId: ObjectID!, $envs: [VariableInput!]!) {
  replaceVariables(projectId: $projectId, serviceId: $serviceId, variables: $envs)
}";

pub const UPDATE_ROOT_DIRECTORY: &str = r"mutation UpdateRootDirectory($projectId: ObjectID!, $serviceId: ObjectID!, $rootDirectory: String!) {
  updateService(_id: $serviceId, projectId: $projectId, rootDirectory: $rootDirectory) {
    _id
  }
}";

pub const REDEPLOY_SERVICE: &str = r"mutation RedeployService($serviceId: ObjectID!) {
  redeployService(_id: $serviceId) {
    _id
    status
  }
}";

pub const STOP_DEPLOYMENT: &str = r"mutation StopDeployment($deploymentId: ObjectID!) {
  stopDeployment(_id: $deploymentId) {
    _id
    status
  }
}";
