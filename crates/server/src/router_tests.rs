// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use driftctl_core::clock::SystemClock;
use driftctl_engine::JobQueue;
use driftctl_storage::{DriftStateStore, JobStore};
use std::sync::Arc;
use tower::ServiceExt;

fn router(rate_limit_per_second: u32) -> Router {
    let (queue, _receiver) = JobQueue::bounded(10);
    let unique = tempfile::NamedTempFile::new().unwrap();
    let drift_state = Arc::new(DriftStateStore::open(unique.path()).unwrap());
    unique.close().unwrap();
    let state = AppState::new(Arc::new(JobStore::new()), queue, drift_state, SystemClock);
    build_router(state, rate_limit_per_second)
}

#[tokio::test]
async fn health_is_reachable_through_the_full_router() {
    let response =
        router(10).oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn the_rate_limit_layer_applies_to_every_route() {
    let app = router(1);
    let first = app.clone().oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
}
