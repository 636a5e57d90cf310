//! reqwest transport against a local mock GraphQL endpoint.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use zeabur_ops::adapter::outbound::http::HttpTransport;
use zeabur_ops::adapter::outbound::zeabur::ZeaburClient;
use zeabur_ops::application::resilient::ResilientClient;
use zeabur_ops::application::retry::RetryPolicy;
use zeabur_ops::domain::ServiceId;
use zeabur_ops::error::ApiError;
use zeabur_ops::infrastructure::config::api::{ApiConfig, Secret};
use zeabur_ops::port::{GraphqlRequest, TlsVerification, Transport, TransportError};

fn api_config(server: &MockServer) -> ApiConfig {
    ApiConfig {
        endpoint: format!("{}/graphql", server.uri()),
        connect_timeout_ms: 2_000,
        read_timeout_ms: 5_000,
        ..ApiConfig::default()
    }
}

fn transport(server: &MockServer) -> HttpTransport {
    HttpTransport::from_config(&api_config(server), &Secret::new("sk-test")).unwrap()
}

#[tokio::test]
async fn posts_query_and_variables_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("authorization", "Bearer sk-test"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "query": "query Ping { __typename }",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "__typename": "Query" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = transport(&server)
        .send(
            &GraphqlRequest::new("query Ping { __typename }"),
            TlsVerification::Verified,
        )
        .await
        .unwrap();
    assert_eq!(response.data, Some(json!({ "__typename": "Query" })));
    assert!(!response.has_errors());
}

#[tokio::test]
async fn errors_field_is_kept_alongside_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "projects": [] },
            "errors": [{ "message": "partial failure" }]
        })))
        .mount(&server)
        .await;

    let response = transport(&server)
        .send(&GraphqlRequest::new("query Projects { projects { _id } }"), TlsVerification::Verified)
        .await
        .unwrap();
    assert!(response.has_errors());
    assert_eq!(response.errors.unwrap()[0].message, "partial failure");
}

#[tokio::test]
async fn non_200_status_is_a_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let err = transport(&server)
        .send(&GraphqlRequest::new("query Ping { __typename }"), TlsVerification::Verified)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        TransportError::Status {
            status: 429,
            body: "slow down".into()
        }
    );
}

#[tokio::test]
async fn malformed_body_is_a_body_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = transport(&server)
        .send(&GraphqlRequest::new("query Ping { __typename }"), TlsVerification::Verified)
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Body(_)));
}

#[tokio::test]
async fn refused_connection_is_a_connect_error() {
    let config = ApiConfig {
        endpoint: "http://127.0.0.1:1/graphql".into(),
        connect_timeout_ms: 2_000,
        ..ApiConfig::default()
    };
    let transport = HttpTransport::from_config(&config, &Secret::new("sk-test")).unwrap();

    let err = transport
        .send(&GraphqlRequest::new("query Ping { __typename }"), TlsVerification::Verified)
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Connect(_)), "got {err:?}");
    assert!(!err.is_tls());
}

#[tokio::test]
async fn client_recovers_from_a_transient_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "variables": { "serviceId": "s-app" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "redeployService": { "_id": "d-9", "status": "PENDING" } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let policy = RetryPolicy::new(3, Duration::from_millis(1));
    let zeabur = ZeaburClient::new(ResilientClient::new(transport(&server), policy));
    let deployment = zeabur_ops::port::ControlPlane::redeploy(&zeabur, &ServiceId::new("s-app"))
        .await
        .unwrap();
    assert_eq!(deployment.unwrap().as_str(), "d-9");
}

#[tokio::test]
async fn exhausted_budget_reports_the_last_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .expect(2)
        .mount(&server)
        .await;

    let policy = RetryPolicy::new(2, Duration::from_millis(1));
    let zeabur = ZeaburClient::new(ResilientClient::new(transport(&server), policy));
    let err = zeabur_ops::port::ControlPlane::ping(&zeabur).await.unwrap_err();
    match err {
        ApiError::Exhausted { attempts, last } => {
            assert_eq!(attempts, 2);
            assert!(matches!(last, TransportError::Status { status: 502, .. }));
        }
        other => panic!("expected exhausted budget, got {other:?}"),
    }
}

#[test]
fn invalid_endpoint_is_a_config_error() {
    let config = ApiConfig {
        endpoint: "not a url".into(),
        ..ApiConfig::default()
    };
    let err = HttpTransport::from_config(&config, &Secret::new("sk-test")).unwrap_err();
    assert!(err.is_config());
}
