//! JSON builders shaped like control-plane `data` payloads.

use serde_json::{json, Value};

/// `{ projects: [...] }` from `(id, name)` pairs.
pub fn projects(items: &[(&str, &str)]) -> Value {
    let projects: Vec<Value> = items
        .iter()
        .map(|(id, name)| json!({ "_id": id, "name": name }))
        .collect();
    json!({ "projects": projects })
}

/// `{ project: { services: [...] } }` from `(id, name, type, status)` tuples.
pub fn services(items: &[(&str, &str, &str, &str)]) -> Value {
    let services: Vec<Value> = items
        .iter()
        .map(|(id, name, kind, status)| {
            json!({
                "_id": id,
                "name": name,
                "type": kind,
                "status": status,
                "createdAt": "2025-01-02T03:04:05Z",
            })
        })
        .collect();
    json!({ "project": { "services": services } })
}

/// A single deployment object.
pub fn deployment(id: &str, status: &str) -> Value {
    json!({
        "_id": id,
        "status": status,
        "createdAt": "2025-01-02T03:04:05Z",
        "updatedAt": "2025-01-02T03:10:00Z",
    })
}

/// `{ service: { deployments: [...] } }` from `(id, status)` pairs.
pub fn deployments(items: &[(&str, &str)]) -> Value {
    let deployments: Vec<Value> = items
        .iter()
        .map(|(id, status)| deployment(id, status))
        .collect();
    json!({ "service": { "deployments": deployments } })
}

/// `{ service: { env: [...] } }` from `(name, value)` pairs.
pub fn variables(items: &[(&str, &str)]) -> Value {
    json!({ "service": { "env": env_list(items) } })
}

/// Full service detail payload.
pub fn service_detail(
    id: &str,
    name: &str,
    status: &str,
    deployments: &[(&str, &str)],
    env: &[(&str, &str)],
) -> Value {
    let deployments: Vec<Value> = deployments
        .iter()
        .map(|(id, status)| deployment(id, status))
        .collect();
    json!({
        "service": {
            "_id": id,
            "name": name,
            "status": status,
            "deployments": deployments,
            "env": env_list(env),
        }
    })
}

/// `{ service: { deployments: [{ ..., logs }] } }` with one deployment's log lines
/// given as `(content, level)` pairs.
pub fn deployment_logs(id: &str, status: &str, lines: &[(&str, &str)]) -> Value {
    let logs: Vec<Value> = lines
        .iter()
        .enumerate()
        .map(|(i, (content, level))| {
            json!({
                "content": content,
                "timestamp": format!("2025-01-02T03:04:{:02}Z", i % 60),
                "level": level,
            })
        })
        .collect();
    json!({ "service": { "deployments": [{ "_id": id, "status": status, "logs": logs }] } })
}

/// `{ redeployService: { _id } }`.
pub fn redeployed(deployment_id: &str) -> Value {
    json!({ "redeployService": { "_id": deployment_id, "status": "PENDING" } })
}

/// `{ stopDeployment: { _id, status } }`.
pub fn stopped(deployment_id: &str) -> Value {
    json!({ "stopDeployment": { "_id": deployment_id, "status": "REMOVED" } })
}

fn env_list(items: &[(&str, &str)]) -> Vec<Value> {
    items
        .iter()
        .map(|(name, value)| json!({ "name": name, "value": value }))
        .collect()
}
