mod common;

use std::sync::Arc;

use common::init_logging;
use poster_core::{messages, JobId, JobParams, RemoteStatus, SubmitOutcome, ValidationError};
use poster_engine::{ApiError, ClientSettings, JobApi, JobSubmitter, ReqwestJobApi};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> ReqwestJobApi {
    ReqwestJobApi::new(&ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    })
    .expect("client")
}

#[tokio::test]
async fn accepted_submission_returns_job() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({
            "city": "Paris",
            "theme": "default",
            "distance": 10000,
            "email": null,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "J1",
            "status": "queued",
            "estimated_seconds": 50,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let submitter = JobSubmitter::new(Arc::new(api_for(&server)));
    let outcome = submitter
        .submit(&JobParams::with_place("Paris"))
        .await
        .expect("valid params");

    assert_eq!(
        outcome,
        SubmitOutcome::Accepted {
            job_id: JobId::new("J1"),
            estimated_seconds: 50,
        }
    );
}

#[tokio::test]
async fn too_many_requests_is_rate_limited() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let submitter = JobSubmitter::new(Arc::new(api_for(&server)));
    let outcome = submitter.submit(&JobParams::with_place("Paris")).await;

    assert_eq!(outcome, Ok(SubmitOutcome::RateLimited));
}

#[tokio::test]
async fn rejection_carries_server_detail() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": {"error": "invalid_theme", "detail": "Unknown theme: neon2"}
        })))
        .mount(&server)
        .await;

    let submitter = JobSubmitter::new(Arc::new(api_for(&server)));
    let outcome = submitter.submit(&JobParams::with_place("Paris")).await;

    assert_eq!(
        outcome,
        Ok(SubmitOutcome::Rejected {
            message: "Unknown theme: neon2".to_string()
        })
    );
}

#[tokio::test]
async fn blank_place_sends_nothing() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let submitter = JobSubmitter::new(Arc::new(api_for(&server)));
    let outcome = submitter.submit(&JobParams::with_place("  ")).await;

    assert_eq!(outcome, Err(ValidationError::MissingPlace));
}

#[tokio::test]
async fn unreachable_service_is_rejected_with_fallback() {
    init_logging();
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let api = ReqwestJobApi::new(&ClientSettings {
        base_url: uri,
        ..ClientSettings::default()
    })
    .unwrap();
    let outcome = JobSubmitter::new(Arc::new(api))
        .submit(&JobParams::with_place("Paris"))
        .await;

    assert_eq!(
        outcome,
        Ok(SubmitOutcome::Rejected {
            message: messages::SOMETHING_WENT_WRONG.to_string()
        })
    );
}

#[tokio::test]
async fn status_resolves_relative_poster_url() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status/J1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "J1",
            "status": "completed",
            "city": "Paris",
            "theme": "default",
            "poster_url": "/api/poster/J1",
            "stage": "done",
        })))
        .mount(&server)
        .await;

    let snapshot = api_for(&server)
        .fetch_status(&JobId::new("J1"))
        .await
        .expect("status");

    assert_eq!(snapshot.status, RemoteStatus::Completed);
    assert_eq!(snapshot.stage.as_deref(), Some("done"));
    assert_eq!(
        snapshot.artifact,
        Some(format!("{}/api/poster/J1", server.uri()))
    );
}

#[tokio::test]
async fn status_http_error_is_an_error() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Job not found"})))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .fetch_status(&JobId::new("missing"))
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::HttpStatus(404));
}

#[tokio::test]
async fn malformed_status_body_is_a_decode_error() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status/J1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .fetch_status(&JobId::new("J1"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}
