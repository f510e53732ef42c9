// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use driftctl_core::clock::SystemClock;
use driftctl_engine::JobQueue;
use driftctl_storage::{DriftStateStore, JobStore};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app(capacity: usize) -> (Router, AppState) {
    let (queue, _receiver) = JobQueue::bounded(capacity);
    let unique = tempfile::NamedTempFile::new().unwrap();
    let drift_state = Arc::new(DriftStateStore::open(unique.path()).unwrap());
    unique.close().unwrap();

    let state = AppState::new(Arc::new(JobStore::new()), queue, drift_state, SystemClock);
    let router = Router::new()
        .route("/api/health", get(health))
        .route("/api/playbook/run", post(submit_playbook))
        .route("/api/jobs", get(list_jobs))
        .route("/api/jobs/:id", get(get_job))
        .route("/api/jobs/:id/retry", post(retry_job))
        .with_state(state.clone());
    (router, state)
}

fn submit_body(repository_url: &str, playbook_path: &str) -> Body {
    Body::from(
        serde_json::json!({
            "repository_url": repository_url,
            "playbook_path": playbook_path,
        })
        .to_string(),
    )
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _state) = test_app(10);
    let response = app.oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn submitting_a_valid_playbook_queues_a_job() {
    let (app, state) = test_app(10);
    let request = Request::builder()
        .method("POST")
        .uri("/api/playbook/run")
        .header("content-type", "application/json")
        .body(submit_body("https://example.com/acme/pb.git", "site.yml"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = json_body(response).await;
    assert_eq!(body["status"], "queued");
    assert!(body["job_id"].as_str().unwrap().starts_with("job-"));
    assert_eq!(state.jobs.list().len(), 1);
}

#[tokio::test]
async fn submitting_a_non_https_url_is_rejected() {
    let (app, _state) = test_app(10);
    let request = Request::builder()
        .method("POST")
        .uri("/api/playbook/run")
        .header("content-type", "application/json")
        .body(submit_body("git@example.com:x/y.git", "site.yml"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn submitting_past_queue_capacity_is_rejected_with_429() {
    let (app, _state) = test_app(0);
    let request = Request::builder()
        .method("POST")
        .uri("/api/playbook/run")
        .header("content-type", "application/json")
        .body(submit_body("https://example.com/acme/pb.git", "site.yml"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn getting_an_unknown_job_is_404() {
    let (app, _state) = test_app(10);
    let response = app.oneshot(Request::builder().uri("/api/jobs/job-999").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn retrying_a_job_bumps_the_retry_count_and_mints_a_new_id() {
    let (app, state) = test_app(10);
    let original = driftctl_core::test_support::sample_job();
    let original_id = original.id;
    state.jobs.insert(original);

    let uri = format!("/api/jobs/{original_id}/retry");
    let response = app.oneshot(Request::builder().method("POST").uri(uri).body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let body = json_body(response).await;
    assert_eq!(body["retry_of"], original_id.to_string());
    assert_ne!(body["job_id"], original_id.to_string());

    let new_id = JobId::from_string(body["job_id"].as_str().unwrap()).unwrap();
    let retried = state.jobs.get(new_id).unwrap();
    assert_eq!(retried.retry_count, 1);
}

#[tokio::test]
async fn retrying_an_unknown_job_is_404() {
    let (app, _state) = test_app(10);
    let response =
        app.oneshot(Request::builder().method("POST").uri("/api/jobs/job-999/retry").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
