// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tagged error kinds shared across the workspace.
//!
//! One enum carries every error kind named in the design (queueing,
//! validation, secret/auth, workspace, clone, runner, state, timeout) so
//! the HTTP boundary can map to a status code in one place instead of
//! string-sniffing error messages. Variants constructed from an
//! underlying `std::io::Error`/`reqwest::Error`/`serde_json::Error`/etc.
//! carry it as `#[source]` so the chain survives for `tracing::error!`
//! call sites even though `Display` only renders the message.

type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A single tagged error kind, the unit the HTTP facade maps to a status
/// code and every job-terminating failure is recorded as.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("queue is full")]
    QueueFull,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("inventory missing: {message}")]
    InventoryMissing {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("workspace provisioning failed: {message}")]
    WorkspaceFailure {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("authentication failed: {message}")]
    AuthFailed {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("clone failed: {0}")]
    CloneFailed(String),

    #[error("secret unavailable: {message}")]
    SecretUnavailable {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("runner failed: {message}")]
    RunnerFailure {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("state store failed: {message}")]
    StateFailure {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("operation timed out: {0}")]
    Timeout(String),
}

impl CoreError {
    pub fn inventory_missing(message: impl Into<String>) -> Self {
        CoreError::InventoryMissing { message: message.into(), source: None }
    }

    pub fn inventory_missing_with(message: impl Into<String>, source: impl Into<BoxedSource>) -> Self {
        CoreError::InventoryMissing { message: message.into(), source: Some(source.into()) }
    }

    pub fn workspace_failure(message: impl Into<String>) -> Self {
        CoreError::WorkspaceFailure { message: message.into(), source: None }
    }

    pub fn workspace_failure_with(message: impl Into<String>, source: impl Into<BoxedSource>) -> Self {
        CoreError::WorkspaceFailure { message: message.into(), source: Some(source.into()) }
    }

    pub fn auth_failed(message: impl Into<String>) -> Self {
        CoreError::AuthFailed { message: message.into(), source: None }
    }

    pub fn auth_failed_with(message: impl Into<String>, source: impl Into<BoxedSource>) -> Self {
        CoreError::AuthFailed { message: message.into(), source: Some(source.into()) }
    }

    pub fn secret_unavailable(message: impl Into<String>) -> Self {
        CoreError::SecretUnavailable { message: message.into(), source: None }
    }

    pub fn secret_unavailable_with(message: impl Into<String>, source: impl Into<BoxedSource>) -> Self {
        CoreError::SecretUnavailable { message: message.into(), source: Some(source.into()) }
    }

    pub fn runner_failure(message: impl Into<String>) -> Self {
        CoreError::RunnerFailure { message: message.into(), source: None }
    }

    pub fn runner_failure_with(message: impl Into<String>, source: impl Into<BoxedSource>) -> Self {
        CoreError::RunnerFailure { message: message.into(), source: Some(source.into()) }
    }

    pub fn state_failure(message: impl Into<String>) -> Self {
        CoreError::StateFailure { message: message.into(), source: None }
    }

    pub fn state_failure_with(message: impl Into<String>, source: impl Into<BoxedSource>) -> Self {
        CoreError::StateFailure { message: message.into(), source: Some(source.into()) }
    }

    /// The stable, lower-snake-case tag used in HTTP error bodies and as
    /// the `Job::error` prefix, independent of the human-readable message.
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::QueueFull => "queue_full",
            CoreError::BadRequest(_) => "bad_request",
            CoreError::InventoryMissing { .. } => "inventory_missing",
            CoreError::WorkspaceFailure { .. } => "workspace_failure",
            CoreError::AuthFailed { .. } => "auth_failed",
            CoreError::CloneFailed(_) => "clone_failed",
            CoreError::SecretUnavailable { .. } => "secret_unavailable",
            CoreError::RunnerFailure { .. } => "runner_failure",
            CoreError::StateFailure { .. } => "state_failure",
            CoreError::Timeout(_) => "timeout",
        }
    }
}

/// Formats a `CoreError` as the `error` string stored on a failed `Job`.
///
/// `"<kind>: <message>"`, e.g. `"inventory_missing: inventory/hosts.ini not found"`.
pub fn job_error_string(err: &CoreError) -> String {
    format!("{}: {}", err.kind(), err)
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
