//! Retrying GraphQL client over a [`Transport`].
//!
//! Classification of a single attempt:
//!
//! | Outcome                               | Action                            |
//! |---------------------------------------|-----------------------------------|
//! | HTTP 200, no `errors` field           | return `data` immediately         |
//! | HTTP 200 with `errors`                | retry; surface as GraphQL error   |
//! | non-200 status (429, 5xx, others)     | retry after backoff               |
//! | connect failure, timeout, TLS failure | retry after backoff               |
//!
//! A TLS failure may additionally buy one attempt with certificate
//! verification relaxed, but only when the operator enabled
//! `allow_insecure_tls_fallback`. That attempt counts against the budget,
//! so a logical call never makes more than `max_attempts` round-trips.
//!
//! Mutations are retried too. The client cannot tell "applied but the
//! response was lost" from "never applied", so it relies on the platform
//! treating redeploy, stop, and variable replacement as idempotent.

use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::retry::RetryPolicy;
use crate::error::ApiError;
use crate::port::{GraphqlError, GraphqlRequest, TlsVerification, Transport, TransportError};

/// What the last failed attempt looked like.
#[derive(Debug)]
enum Failure {
    Graphql(Vec<GraphqlError>),
    Transport(TransportError),
}

/// Wraps a transport with retry, backoff, and error classification.
pub struct ResilientClient<T> {
    transport: T,
    policy: RetryPolicy,
    insecure_tls_fallback: bool,
}

impl<T: Transport> ResilientClient<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self {
            transport,
            policy,
            insecure_tls_fallback: false,
        }
    }

    /// Opt in to one relaxed-verification attempt after a TLS failure.
    #[must_use]
    pub fn with_insecure_tls_fallback(mut self, enabled: bool) -> Self {
        self.insecure_tls_fallback = enabled;
        self
    }

    #[must_use]
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run one logical call, returning the response `data` (`Null` when absent).
    ///
    /// # Errors
    ///
    /// [`ApiError::Graphql`] when the last attempt returned an `errors` list,
    /// [`ApiError::Exhausted`] when it failed at the transport level.
    pub async fn execute(&self, request: &GraphqlRequest) -> Result<Value, ApiError> {
        let max_attempts = self.policy.max_attempts();
        let mut tls = TlsVerification::Verified;
        let mut fallback_used = false;
        let mut skip_backoff = false;
        let mut last = None;

        for attempt in 1..=max_attempts {
            if attempt > 1 && !skip_backoff {
                let delay = self.policy.delay_before(attempt);
                if !delay.is_zero() {
                    debug!(attempt, ?delay, "Backing off");
                    sleep(delay).await;
                }
            }
            skip_backoff = false;
            let mode = tls;
            tls = TlsVerification::Verified;

            match self.transport.send(request, mode).await {
                Ok(response) if !response.has_errors() => {
                    debug!(attempt, "GraphQL call succeeded");
                    return Ok(response.data.unwrap_or(Value::Null));
                }
                Ok(response) => {
                    let errors = response.errors.unwrap_or_default();
                    warn!(
                        attempt,
                        max_attempts,
                        errors = %summarize(&errors),
                        "GraphQL returned errors, retrying"
                    );
                    last = Some(Failure::Graphql(errors));
                }
                Err(err) => {
                    warn!(attempt, max_attempts, error = %err, "Control-plane request failed");
                    if err.is_tls()
                        && self.insecure_tls_fallback
                        && !fallback_used
                        && self.policy.allows_after(attempt)
                    {
                        warn!("Retrying once with certificate verification disabled (opted in)");
                        fallback_used = true;
                        tls = TlsVerification::Relaxed;
                        skip_backoff = true;
                    }
                    last = Some(Failure::Transport(err));
                }
            }
        }

        Err(match last {
            Some(Failure::Graphql(errors)) => ApiError::Graphql {
                attempts: max_attempts,
                errors,
            },
            Some(Failure::Transport(last)) => ApiError::Exhausted {
                attempts: max_attempts,
                last,
            },
            None => ApiError::Exhausted {
                attempts: 0,
                last: TransportError::Request("no attempt was made".into()),
            },
        })
    }
}

fn summarize(errors: &[GraphqlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::json;
    use tokio::time::Instant;

    use crate::port::GraphqlResponse;
    use crate::testkit;
    use crate::testkit::transport::ScriptedTransport;

    /// Records the (virtual) instant each attempt starts.
    struct Clocked {
        inner: ScriptedTransport,
        started: Mutex<Vec<Instant>>,
    }

    impl Clocked {
        fn new(inner: ScriptedTransport) -> Self {
            Self {
                inner,
                started: Mutex::new(Vec::new()),
            }
        }

        /// Gaps between consecutive attempt starts.
        fn gaps(&self) -> Vec<Duration> {
            let started = self.started.lock().unwrap();
            started.windows(2).map(|w| w[1] - w[0]).collect()
        }
    }

    #[async_trait]
    impl Transport for Clocked {
        async fn send(
            &self,
            request: &GraphqlRequest,
            tls: TlsVerification,
        ) -> Result<GraphqlResponse, TransportError> {
            self.started.lock().unwrap().push(Instant::now());
            self.inner.send(request, tls).await
        }
    }

    fn ping() -> GraphqlRequest {
        GraphqlRequest::new("query Ping { __typename }")
    }

    fn status(code: u16) -> TransportError {
        TransportError::Status {
            status: code,
            body: "upstream".into(),
        }
    }

    #[tokio::test]
    async fn first_success_makes_one_call() {
        let transport = ScriptedTransport::new().push_data(json!({ "ok": true }));
        let counter = transport.counter();
        let client = ResilientClient::new(transport, testkit::config::retry(5));

        let data = client.execute(&ping()).await.unwrap();
        assert_eq!(data, json!({ "ok": true }));
        assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn never_exceeds_budget() {
        for budget in 1..=6u32 {
            let mut transport = ScriptedTransport::new();
            for _ in 0..10 {
                transport = transport.push_failure(status(503));
            }
            let client = ResilientClient::new(transport, testkit::config::retry(budget));

            let err = client.execute(&ping()).await.unwrap_err();
            assert!(matches!(err, ApiError::Exhausted { attempts, .. } if attempts == budget));
            assert_eq!(client.transport().call_count(), budget);
        }
    }

    #[tokio::test]
    async fn recovers_after_transient_failures() {
        let transport = ScriptedTransport::new()
            .push_failure(status(429))
            .push_failure(TransportError::Timeout("read".into()))
            .push_data(json!({ "projects": [] }));
        let client = ResilientClient::new(transport, testkit::config::retry(5));

        let data = client.execute(&ping()).await.unwrap();
        assert_eq!(data, json!({ "projects": [] }));
        assert_eq!(client.transport().call_count(), 3);
    }

    #[tokio::test]
    async fn graphql_errors_are_retried_and_preserved() {
        let transport = ScriptedTransport::new()
            .push(Ok(crate::port::GraphqlResponse {
                data: Some(json!({ "partial": true })),
                errors: Some(vec![GraphqlError::new("first")]),
            }))
            .push_errors(&["rate limited", "try later"])
            .push_errors(&["still failing", "really"]);
        let client = ResilientClient::new(transport, testkit::config::retry(3));

        match client.execute(&ping()).await {
            Err(ApiError::Graphql { attempts, errors }) => {
                assert_eq!(attempts, 3);
                let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
                assert_eq!(messages, vec!["still failing", "really"]);
            }
            other => panic!("expected GraphQL error, got {other:?}"),
        }
        assert_eq!(client.transport().call_count(), 3);
    }

    #[tokio::test]
    async fn partial_data_with_errors_is_not_returned() {
        let transport = ScriptedTransport::new()
            .push(Ok(crate::port::GraphqlResponse {
                data: Some(json!({ "projects": [{ "_id": "p1" }] })),
                errors: Some(vec![GraphqlError::new("partial")]),
            }))
            .push_data(json!({ "projects": [] }));
        let client = ResilientClient::new(transport, testkit::config::retry(2));

        let data = client.execute(&ping()).await.unwrap();
        assert_eq!(data, json!({ "projects": [] }));
    }

    #[tokio::test]
    async fn success_without_data_is_null_not_failure() {
        let transport = ScriptedTransport::new().push(Ok(crate::port::GraphqlResponse::default()));
        let client = ResilientClient::new(transport, testkit::config::retry(3));

        assert_eq!(client.execute(&ping()).await.unwrap(), Value::Null);
        assert_eq!(client.transport().call_count(), 1);
    }

    #[tokio::test]
    async fn tls_failure_without_opt_in_stays_verified() {
        let transport = ScriptedTransport::new()
            .push_failure(TransportError::Tls("bad certificate".into()))
            .push_data(json!({}));
        let client = ResilientClient::new(transport, testkit::config::retry(3));

        client.execute(&ping()).await.unwrap();
        let modes: Vec<_> = client.transport().calls().iter().map(|c| c.tls).collect();
        assert_eq!(
            modes,
            vec![TlsVerification::Verified, TlsVerification::Verified]
        );
    }

    #[tokio::test]
    async fn tls_fallback_runs_once_and_counts_against_budget() {
        let transport = ScriptedTransport::new()
            .push_failure(TransportError::Tls("bad certificate".into()))
            .push_failure(TransportError::Tls("still bad".into()))
            .push_failure(TransportError::Tls("bad again".into()))
            .push_failure(TransportError::Tls("and again".into()));
        let client =
            ResilientClient::new(transport, testkit::config::retry(4)).with_insecure_tls_fallback(true);

        let err = client.execute(&ping()).await.unwrap_err();
        assert!(matches!(err, ApiError::Exhausted { last: TransportError::Tls(_), .. }));

        let modes: Vec<_> = client.transport().calls().iter().map(|c| c.tls).collect();
        assert_eq!(
            modes,
            vec![
                TlsVerification::Verified,
                TlsVerification::Relaxed,
                TlsVerification::Verified,
                TlsVerification::Verified,
            ]
        );
    }

    #[tokio::test]
    async fn tls_fallback_skipped_on_last_attempt() {
        let transport = ScriptedTransport::new()
            .push_failure(TransportError::Tls("bad certificate".into()));
        let client =
            ResilientClient::new(transport, testkit::config::retry(1)).with_insecure_tls_fallback(true);

        assert!(client.execute(&ping()).await.is_err());
        assert_eq!(client.transport().call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_doubles_from_the_base_delay() {
        let transport = Clocked::new(
            ScriptedTransport::new()
                .push_failure(status(503))
                .push_failure(status(503))
                .push_failure(status(503)),
        );
        let client = ResilientClient::new(transport, RetryPolicy::new(3, Duration::from_secs(1)));

        let start = Instant::now();
        assert!(client.execute(&ping()).await.is_err());
        assert_eq!(start.elapsed(), Duration::from_secs(3));
        assert_eq!(
            client.transport().gaps(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn relaxed_tls_attempt_follows_without_backoff() {
        let transport = Clocked::new(
            ScriptedTransport::new()
                .push_failure(TransportError::Tls("bad certificate".into()))
                .push_failure(TransportError::Tls("still bad".into()))
                .push_data(json!({})),
        );
        let client = ResilientClient::new(transport, RetryPolicy::default())
            .with_insecure_tls_fallback(true);

        client.execute(&ping()).await.unwrap();
        // Relaxed attempt is immediate; the next one waits delay_before(3).
        assert_eq!(
            client.transport().gaps(),
            vec![Duration::ZERO, Duration::from_secs(2)]
        );
        let modes: Vec<_> = client.transport().inner.calls().iter().map(|c| c.tls).collect();
        assert_eq!(
            modes,
            vec![
                TlsVerification::Verified,
                TlsVerification::Relaxed,
                TlsVerification::Verified,
            ]
        );
    }
}
