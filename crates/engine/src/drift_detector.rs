// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drift Detector (C10): periodic dry-run re-evaluation of known
//! playbooks, classifying drift and triggering remediation via the same
//! seams the Orchestrator uses (spec.md §4.10).

use crate::ignorability::run_is_ignorable;
use crate::ports::{AuthMinter, SecretSource, WorkspaceSource};
use driftctl_core::clock::Clock;
use driftctl_core::error::CoreError;
use driftctl_core::playbook_state::{PlaybookState, RunStatus};
use driftctl_runner::{RunMode, RunnerInvoker, RunnerRequest};
use driftctl_storage::DriftStateStore;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

const REPO_AUTH_PATH: &str = "repo-auth";

/// Periodically re-runs every known playbook in check mode and, when real
/// drift is detected, remediates it in apply mode.
pub struct DriftDetector<C: Clock> {
    secrets: Arc<dyn SecretSource>,
    auth_minter: Arc<dyn AuthMinter>,
    workspace: Arc<dyn WorkspaceSource>,
    runner: Arc<dyn RunnerInvoker>,
    drift_state: Arc<DriftStateStore>,
    clock: C,
    interval: Duration,
}

impl<C: Clock> DriftDetector<C> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        secrets: Arc<dyn SecretSource>,
        auth_minter: Arc<dyn AuthMinter>,
        workspace: Arc<dyn WorkspaceSource>,
        runner: Arc<dyn RunnerInvoker>,
        drift_state: Arc<DriftStateStore>,
        clock: C,
        interval: Duration,
    ) -> Self {
        Self { secrets, auth_minter, workspace, runner, drift_state, clock, interval }
    }

    /// Runs forever: one cycle immediately, then one every `interval`
    /// (default 3 minutes per spec.md §4.10).
    pub async fn run_forever(&self) {
        loop {
            self.run_cycle().await;
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Evaluate every known entry once. Per-entry errors are logged and
    /// recorded on that entry; they never abort the cycle (spec.md §7).
    pub async fn run_cycle(&self) {
        let entries = self.drift_state.list();
        for (key, state) in entries {
            self.evaluate_entry(&key, state).await;
        }
    }

    async fn evaluate_entry(&self, key: &str, mut state: PlaybookState) {
        match self.evaluate(&state).await {
            Ok(updated) => {
                state = updated;
                state.error = None;
            }
            Err(e) => {
                tracing::warn!(repository = %state.repository_url, playbook = %state.playbook_path, error = %e, "drift evaluation failed");
                state.last_status = RunStatus::Error;
                state.error = Some(driftctl_core::error::job_error_string(&e));
            }
        }

        if let Err(e) = self.drift_state.update(key.to_string(), state) {
            tracing::warn!(error = %e, "failed to persist drift state after evaluation");
        }
    }

    async fn evaluate(&self, state: &PlaybookState) -> Result<PlaybookState, CoreError> {
        // Step 1: re-mint token, best-effort remote-ref query.
        let bundle = self.secrets.get(REPO_AUTH_PATH).await?;
        let app_id = bundle.get("app_id").unwrap_or_default();
        let installation_id = bundle.get("installation_id").unwrap_or_default();
        let private_key = bundle.get("private_key").unwrap_or_default();
        let token = self.auth_minter.mint(app_id, installation_id, private_key).await?;

        let clone_url = token
            .into_url(&state.repository_url)
            .unwrap_or_else(|| state.repository_url.clone());

        let playbook_commit = match driftctl_workspace::query_head_commit(&clone_url, &state.branch).await {
            Ok(commit) => Some(commit),
            Err(e) => {
                tracing::warn!(error = %e, "remote-ref query failed, proceeding with commit unknown");
                None
            }
        };

        // Step 2: provision + clone at HEAD.
        let workspace = self.workspace.provision(&state.repository_url, &state.branch, &clone_url).await?;

        // Step 3: locate inventory (fails the entry if neither path exists).
        let inventory_path = driftctl_workspace::locate_inventory(workspace.path())?;

        // Step 4: check mode.
        let check_request = RunnerRequest {
            playbook_path: workspace.path().join(&state.playbook_path),
            inventory_path,
            target_hosts: state.target_hosts.clone(),
            private_key_path: None,
            become_password_file: None,
            become_method: None,
            mode: RunMode::Check,
            environment: HashMap::new(),
        };
        let check_result = self.runner.run(&check_request).await?;

        // Step 5: classify. The diff text lives inline in the runner's
        // stdout (emitted by `--diff`), split per `TASK` banner so each
        // segment is judged against its own task's name.
        let drift_detected =
            check_result.would_change(RunMode::Check) && !run_is_ignorable(&check_result.raw_stdout);

        let mut last_remediation_time = state.last_remediation_time;
        let mut last_remediation_status = state.last_remediation_status;

        // Step 6: remediate on real drift.
        if drift_detected {
            let apply_request = RunnerRequest {
                playbook_path: workspace.path().join(&state.playbook_path),
                inventory_path: check_request.inventory_path.clone(),
                target_hosts: state.target_hosts.clone(),
                private_key_path: None,
                become_password_file: None,
                become_method: None,
                mode: RunMode::Apply,
                environment: HashMap::new(),
            };
            let remediation_status = match self.runner.run(&apply_request).await {
                Ok(result) if result.exit_ok => RunStatus::Ok,
                Ok(_) => RunStatus::Failed,
                Err(_) => RunStatus::Failed,
            };
            last_remediation_time = Some(self.clock.epoch_ms());
            last_remediation_status = Some(remediation_status);
        }

        let file_hash = hash_file(&workspace.path().join(&state.playbook_path)).unwrap_or_else(|| state.last_hash.clone());

        Ok(PlaybookState {
            repository_url: state.repository_url.clone(),
            playbook_path: state.playbook_path.clone(),
            last_run: self.clock.epoch_ms(),
            last_hash: file_hash,
            last_status: RunStatus::Ok,
            last_remediation_time,
            last_remediation_status,
            drift_detected,
            playbook_commit: playbook_commit.or_else(|| state.playbook_commit.clone()),
            target_hosts: state.target_hosts.clone(),
            branch: state.branch.clone(),
            error: None,
        })
    }
}

fn hash_file(path: &std::path::Path) -> Option<String> {
    use sha2::{Digest, Sha256};
    let bytes = std::fs::read(path).ok()?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Some(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
#[path = "drift_detector_tests.rs"]
mod tests;
