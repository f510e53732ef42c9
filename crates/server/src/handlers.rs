// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The five HTTP handlers (spec.md §6), kept thin: validate, touch the Job
//! Store / Job Queue, translate to a response. All actual work happens in
//! `driftctl-engine`.

use crate::error::{not_found, ApiError};
use crate::state::{AppState, VERSION};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use driftctl_core::error::CoreError;
use driftctl_core::job::{Job, JobConfig, JobId};
use driftctl_core::PlaybookRequest;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Serialize)]
pub struct HealthBody {
    status: &'static str,
    version: &'static str,
}

pub async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok", version: VERSION })
}

#[derive(Serialize)]
pub struct QueuedBody {
    status: &'static str,
    job_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_of: Option<String>,
}

pub async fn submit_playbook(
    State(state): State<AppState>,
    Json(request): Json<PlaybookRequest>,
) -> Result<Response, ApiError> {
    request.validate()?;

    let mut builder = JobConfig::builder(request.repository_url, request.playbook_path)
        .environment(request.environment)
        .secrets(request.secrets);
    if let Some(target_hosts) = request.target_hosts {
        builder = builder.target_hosts(target_hosts);
    }
    if let Some(inventory) = request.inventory {
        builder = builder.inventory(inventory);
    }

    let job_id = enqueue(&state, builder.build())?;
    let body = QueuedBody { status: "queued", job_id: job_id.to_string(), retry_of: None };
    Ok((StatusCode::ACCEPTED, Json(body)).into_response())
}

pub async fn list_jobs(State(state): State<AppState>) -> Json<HashMap<String, Job>> {
    let jobs = state.jobs.list();
    Json(jobs.into_iter().map(|(id, job)| (id.to_string(), job)).collect())
}

pub async fn get_job(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Some(id) = JobId::from_string(&id) else {
        return not_found(format!("no such job: {id}"));
    };
    match state.jobs.get(id) {
        Some(job) => Json(job).into_response(),
        None => not_found(format!("no such job: {id}")),
    }
}

pub async fn retry_job(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Some(original_id) = JobId::from_string(&id) else {
        return not_found(format!("no such job: {id}"));
    };
    let Some(original) = state.jobs.get(original_id) else {
        return not_found(format!("no such job: {id}"));
    };

    let config = original.retry_config();
    match enqueue(&state, config) {
        Ok(new_id) => {
            let body = QueuedBody {
                status: "queued",
                job_id: new_id.to_string(),
                retry_of: Some(original_id.to_string()),
            };
            (StatusCode::ACCEPTED, Json(body)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

/// Record the `Job` in the Job Store before handing its id to the queue:
/// a worker can dequeue the id the instant `try_enqueue` returns, and it
/// must find the job already there. A full queue leaves the record behind
/// as an unpicked `Queued` job — visible in `GET /api/jobs`, never run.
fn enqueue(state: &AppState, config: JobConfig) -> Result<JobId, ApiError> {
    let job = Job::new(config, &state.clock);
    let id = job.id;
    state.jobs.insert(job);

    state.queue.try_enqueue(id).map_err(|_queue_full| ApiError(CoreError::QueueFull))?;
    Ok(id)
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
