//! Scripted [`Transport`] for deterministic tests.
//!
//! Two ways to script outcomes:
//!
//! - **Queue** ([`ScriptedTransport::push`]) - outcomes are returned in
//!   order regardless of the operation. Best for retry-loop tests.
//! - **Routes** ([`ScriptedTransport::route`]) - outcomes keyed by GraphQL
//!   operation name. Each route pops its queue; the last outcome repeats.
//!   Best for workflow tests that issue several different operations.
//!
//! Every call is recorded, so tests can assert round-trip counts, the TLS
//! mode of each attempt, and the variables sent with each mutation.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;

use crate::port::{
    GraphqlError, GraphqlRequest, GraphqlResponse, TlsVerification, Transport, TransportError,
};

pub type Outcome = Result<GraphqlResponse, TransportError>;

/// One recorded call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub operation: String,
    pub request: GraphqlRequest,
    pub tls: TlsVerification,
}

/// Extract the operation name from a document such as
/// `mutation RedeployService($serviceId: ObjectID!) { ... }`.
#[must_use]
pub fn operation_name(query: &str) -> String {
    let mut tokens = query.split_whitespace();
    match tokens.next() {
        Some("query") | Some("mutation") => tokens
            .next()
            .map(|name| {
                name.split(|c| c == '(' || c == '{')
                    .next()
                    .unwrap_or_default()
                    .to_string()
            })
            .unwrap_or_default(),
        _ => String::new(),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Default)]
pub struct ScriptedTransport {
    queue: Mutex<VecDeque<Outcome>>,
    routes: Mutex<HashMap<String, VecDeque<Outcome>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    call_count: Arc<AtomicU32>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an outcome for the next unrouted call.
    #[must_use]
    pub fn push(self, outcome: Outcome) -> Self {
        lock(&self.queue).push_back(outcome);
        self
    }

    /// Queue a successful `data` response.
    #[must_use]
    pub fn push_data(self, data: Value) -> Self {
        self.push(Ok(GraphqlResponse::data(data)))
    }

    /// Queue a response carrying GraphQL errors.
    #[must_use]
    pub fn push_errors(self, messages: &[&str]) -> Self {
        self.push(Ok(graphql_errors(messages)))
    }

    /// Queue a transport failure.
    #[must_use]
    pub fn push_failure(self, err: TransportError) -> Self {
        self.push(Err(err))
    }

    /// Add an outcome for calls to `operation`.
    #[must_use]
    pub fn route(self, operation: &str, outcome: Outcome) -> Self {
        lock(&self.routes)
            .entry(operation.to_string())
            .or_default()
            .push_back(outcome);
        self
    }

    /// Add a successful `data` response for calls to `operation`.
    #[must_use]
    pub fn route_data(self, operation: &str, data: Value) -> Self {
        self.route(operation, Ok(GraphqlResponse::data(data)))
    }

    /// Shared call counter, usable after the transport is moved into a client.
    pub fn counter(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.call_count)
    }

    /// Shared call log, usable after the transport is moved into a client.
    pub fn log(&self) -> Arc<Mutex<Vec<RecordedCall>>> {
        Arc::clone(&self.calls)
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Calls whose operation name equals `operation`.
    pub fn calls_to(&self, operation: &str) -> Vec<RecordedCall> {
        calls_to(&self.calls, operation)
    }

    fn next_outcome(&self, operation: &str) -> Outcome {
        if let Some(outcomes) = lock(&self.routes).get_mut(operation) {
            if outcomes.len() > 1 {
                if let Some(outcome) = outcomes.pop_front() {
                    return outcome;
                }
            }
            if let Some(outcome) = outcomes.front() {
                return outcome.clone();
            }
        }
        lock(&self.queue).pop_front().unwrap_or_else(|| {
            Err(TransportError::Connect(format!(
                "no scripted response for {operation}"
            )))
        })
    }
}

/// Filter a shared call log by operation name.
pub fn calls_to(log: &Mutex<Vec<RecordedCall>>, operation: &str) -> Vec<RecordedCall> {
    lock(log)
        .iter()
        .filter(|call| call.operation == operation)
        .cloned()
        .collect()
}

/// A response with the given error messages and no data.
#[must_use]
pub fn graphql_errors(messages: &[&str]) -> GraphqlResponse {
    GraphqlResponse {
        data: None,
        errors: Some(messages.iter().map(|m| GraphqlError::new(*m)).collect()),
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &GraphqlRequest, tls: TlsVerification) -> Outcome {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let operation = operation_name(&request.query);
        lock(&self.calls).push(RecordedCall {
            operation: operation.clone(),
            request: request.clone(),
            tls,
        });
        self.next_outcome(&operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn operation_names_are_parsed() {
        assert_eq!(
            operation_name("mutation RedeployService($serviceId: ObjectID!) { x }"),
            "RedeployService"
        );
        assert_eq!(operation_name("query Projects { projects { _id } }"), "Projects");
        assert_eq!(operation_name("query Ping{ __typename }"), "Ping");
        assert_eq!(operation_name("{ __typename }"), "");
    }

    #[tokio::test]
    async fn routes_repeat_their_last_outcome() {
        let transport = ScriptedTransport::new()
            .route_data("Ping", json!({ "__typename": "Query" }));
        let request = GraphqlRequest::new("query Ping { __typename }");

        for _ in 0..3 {
            let response = transport
                .send(&request, TlsVerification::Verified)
                .await
                .unwrap();
            assert_eq!(response.data, Some(json!({ "__typename": "Query" })));
        }
        assert_eq!(transport.call_count(), 3);
        assert_eq!(transport.calls_to("Ping").len(), 3);
    }

    #[tokio::test]
    async fn empty_script_fails_the_call() {
        let transport = ScriptedTransport::new();
        let result = transport
            .send(&GraphqlRequest::new("query Ping { __typename }"), TlsVerification::Verified)
            .await;
        assert!(matches!(result, Err(TransportError::Connect(_))));
    }
}
