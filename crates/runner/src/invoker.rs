// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runner Invoker (C5): builds the runner command line/environment and
//! captures its output.

use crate::parser::parse_runner_output;
use crate::types::{RunMode, RunnerRequest, RunnerResult};
use async_trait::async_trait;
use driftctl_core::error::CoreError;
use std::time::Duration;
use tokio::process::Command;

#[async_trait]
pub trait RunnerInvoker: Send + Sync {
    async fn run(&self, request: &RunnerRequest) -> Result<RunnerResult, CoreError>;
}

/// Invokes a real runner binary via `tokio::process::Command`.
///
/// There is no spec-mandated per-job timeout; `timeout` is the single
/// operator-enabled guard point discussed in spec.md §9's Open Questions,
/// `None` by default.
pub struct ProcessRunnerInvoker {
    binary: String,
    timeout: Option<Duration>,
}

impl ProcessRunnerInvoker {
    pub fn new(binary: impl Into<String>) -> Self {
        Self { binary: binary.into(), timeout: None }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl RunnerInvoker for ProcessRunnerInvoker {
    async fn run(&self, request: &RunnerRequest) -> Result<RunnerResult, CoreError> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg(&request.playbook_path);
        cmd.arg("-i").arg(&request.inventory_path);

        if let Some(target) = &request.target_hosts {
            cmd.arg("--limit").arg(target);
        }
        if let Some(key) = &request.private_key_path {
            cmd.arg("--private-key").arg(key);
        }
        if request.mode == RunMode::Check {
            cmd.arg("--check").arg("--diff");
        }
        if let Some(become_file) = &request.become_password_file {
            cmd.arg("--become").arg("--become-password-file").arg(become_file);
            if let Some(become_method) = request.become_method {
                cmd.arg(format!("--become-method={}", become_method.as_str()));
            }
        }

        // Host-key checking disabled, an explicit interpreter path, and a
        // roles search path rooted at the workspace (spec.md §4.5).
        cmd.env("ANSIBLE_HOST_KEY_CHECKING", "False");
        cmd.env("ANSIBLE_PYTHON_INTERPRETER", "auto_silent");
        if let Some(roles_path) = request.inventory_path.parent().and_then(|p| p.parent()) {
            cmd.env("ANSIBLE_ROLES_PATH", roles_path.join("roles"));
        }
        for (key, value) in &request.environment {
            cmd.env(key, value);
        }

        let output = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, cmd.output())
                .await
                .map_err(|_| CoreError::Timeout(format!("runner timed out after {timeout:?}")))?
                .map_err(|e| {
                    let message = format!("failed to spawn runner: {e}");
                    CoreError::runner_failure_with(message, e)
                })?,
            None => cmd.output().await.map_err(|e| {
                let message = format!("failed to spawn runner: {e}");
                CoreError::runner_failure_with(message, e)
            })?,
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        Ok(parse_runner_output(&stdout, &stderr, output.status.success()))
    }
}

#[cfg(test)]
#[path = "invoker_tests.rs"]
mod tests;
