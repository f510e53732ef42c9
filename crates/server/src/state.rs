// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared handles threaded through every handler via `axum::extract::State`.

use driftctl_core::clock::SystemClock;
use driftctl_engine::JobQueue;
use driftctl_storage::{DriftStateStore, JobStore};
use std::sync::Arc;

/// Version string reported by `GET /api/health`, taken from the crate's own
/// manifest rather than hand-maintained.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything a handler touches. The worker pool and Drift Detector are
/// spawned separately in `main` — they drain the same `JobQueue` and
/// `DriftStateStore` but are not themselves part of the request path.
#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<JobStore>,
    pub queue: JobQueue,
    pub drift_state: Arc<DriftStateStore>,
    pub clock: SystemClock,
}

impl AppState {
    pub fn new(jobs: Arc<JobStore>, queue: JobQueue, drift_state: Arc<DriftStateStore>, clock: SystemClock) -> Self {
        Self { jobs, queue, drift_state, clock }
    }
}
