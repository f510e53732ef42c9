// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Route table for the HTTP Facade (C11), all under `/api` per spec.md §6.

use crate::handlers::{get_job, health, list_jobs, retry_job, submit_playbook};
use crate::rate_limit::{rate_limit, RateLimitLayer};
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState, rate_limit_per_second: u32) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/playbook/run", post(submit_playbook))
        .route("/api/jobs", get(list_jobs))
        .route("/api/jobs/:id", get(get_job))
        .route("/api/jobs/:id/retry", post(retry_job))
        .layer(axum::middleware::from_fn_with_state(RateLimitLayer::new(rate_limit_per_second), rate_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
