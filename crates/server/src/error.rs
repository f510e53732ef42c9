// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized error-to-status mapping (spec.md §7): every job-execution
//! error kind is mapped here once, instead of string-sniffing at each
//! handler.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use driftctl_core::error::CoreError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

/// Wraps a `CoreError` so it can be returned directly from a handler.
pub struct ApiError(pub CoreError);

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        let body = ErrorBody { error: self.0.kind(), message: self.0.to_string() };
        (status, Json(body)).into_response()
    }
}

fn status_for(err: &CoreError) -> StatusCode {
    match err {
        CoreError::BadRequest(_) => StatusCode::BAD_REQUEST,
        CoreError::QueueFull => StatusCode::TOO_MANY_REQUESTS,
        CoreError::InventoryMissing { .. }
        | CoreError::WorkspaceFailure { .. }
        | CoreError::AuthFailed { .. }
        | CoreError::CloneFailed(_)
        | CoreError::SecretUnavailable { .. }
        | CoreError::RunnerFailure { .. }
        | CoreError::StateFailure { .. }
        | CoreError::Timeout(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn not_found(message: impl Into<String>) -> Response {
    let body = ErrorBody { error: "not_found", message: message.into() };
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

pub fn too_many_requests() -> Response {
    let body = ErrorBody { error: "rate_limited", message: "too many requests".to_string() };
    (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response()
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
