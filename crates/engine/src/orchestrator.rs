// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job Orchestrator (C8): the critical path. Coordinates the Secret
//! Resolver, Repo-Auth Minter, Workspace Provisioner, Inventory
//! Materializer and Runner Invoker for one job's full lifecycle
//! (spec.md §4.8).

use crate::credentials::{default_target, targets_windows};
use crate::ephemeral_file::EphemeralFile;
use crate::ports::{AuthMinter, SecretSource, WorkspaceSource};
use crate::report::{format_finished_at, structured_report};
use driftctl_core::clock::Clock;
use driftctl_core::error::{job_error_string, CoreError};
use driftctl_core::job::{Job, JobId, JobStatus};
use driftctl_core::playbook_state::{PlaybookKey, PlaybookState, RunStatus};
use driftctl_runner::{BecomeMethod, RunMode, RunnerInvoker, RunnerRequest};
use driftctl_storage::{DriftStateStore, JobStore};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

const REPO_AUTH_PATH: &str = "repo-auth";
const POSIX_CREDENTIALS_PATH: &str = "runner/credentials";
const WINRM_CREDENTIALS_PATH: &str = "runner/winrm";
const SSH_KEY_PATH: &str = "runner/ssh-key";

pub struct JobOrchestrator<C: Clock> {
    secrets: Arc<dyn SecretSource>,
    auth_minter: Arc<dyn AuthMinter>,
    workspace: Arc<dyn WorkspaceSource>,
    runner: Arc<dyn RunnerInvoker>,
    jobs: Arc<JobStore>,
    drift_state: Arc<DriftStateStore>,
    clock: C,
}

impl<C: Clock> JobOrchestrator<C> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        secrets: Arc<dyn SecretSource>,
        auth_minter: Arc<dyn AuthMinter>,
        workspace: Arc<dyn WorkspaceSource>,
        runner: Arc<dyn RunnerInvoker>,
        jobs: Arc<JobStore>,
        drift_state: Arc<DriftStateStore>,
        clock: C,
    ) -> Self {
        Self { secrets, auth_minter, workspace, runner, jobs, drift_state, clock }
    }

    /// Run one job to completion. `id` must already exist in the Job Store
    /// in `Queued` status; the worker pool is the only caller.
    pub async fn run_job(&self, id: JobId) {
        let Some(job) = self.jobs.get(id) else {
            tracing::warn!(job_id = %id, "run_job called for unknown job");
            return;
        };

        tracing::info!(
            job_id = %job.id,
            repository = %job.repository_url,
            playbook = %job.playbook_path,
            target_hosts = ?job.target_hosts,
            "starting job",
        );

        self.jobs.update(id, |job| {
            let _ = job.start_running();
        });

        let outcome = self.execute(&job).await;
        let finished_at = format_finished_at(self.clock.epoch_ms());

        let (status, output, error) = match outcome {
            Ok((result, file_hash, playbook_commit)) => {
                let output = structured_report(&result, &finished_at, None);
                self.record_reconciliation(&job, RunStatus::Ok, file_hash, playbook_commit);
                (JobStatus::Completed, output, None)
            }
            Err((err, result)) => {
                let message = job_error_string(&err);
                let output = match &result {
                    Some(result) => structured_report(result, &finished_at, Some(&message)),
                    None => format!("FAILED: {message} at {finished_at}\n"),
                };
                self.record_reconciliation(&job, RunStatus::Failed, None, None);
                (JobStatus::Failed, output, Some(message))
            }
        };

        self.jobs.update(id, |job| {
            let _ = job.finish(status, output, error, &self.clock);
        });

        tracing::info!(job_id = %id, status = %status, "job finished");
    }

    /// Steps 2–11. Returns the runner result plus reconciliation inputs on
    /// success, or the failing error (with whatever `RunnerResult` had been
    /// captured so far, for the failure report) on failure.
    async fn execute(
        &self,
        job: &Job,
    ) -> Result<
        (driftctl_runner::RunnerResult, Option<String>, Option<String>),
        (CoreError, Option<driftctl_runner::RunnerResult>),
    > {
        // Step 2-3: workspace + repo auth.
        let bundle = self.secrets.get(REPO_AUTH_PATH).await.map_err(|e| (e, None))?;
        let app_id = bundle.get("app_id").unwrap_or_default();
        let installation_id = bundle.get("installation_id").unwrap_or_default();
        let private_key = bundle.get("private_key").unwrap_or_default();
        let token = self
            .auth_minter
            .mint(app_id, installation_id, private_key)
            .await
            .map_err(|e| (e, None))?;

        let clone_url = token
            .into_url(&job.repository_url)
            .unwrap_or_else(|| job.repository_url.clone());

        // Step 4: clone.
        let workspace = self
            .workspace
            .provision(&job.repository_url, &job.runbook_ref, &clone_url)
            .await
            .map_err(|e| (e, None))?;

        // Step 5: inventory.
        let inventory_path = driftctl_workspace::materialize_inventory(
            workspace.path(),
            job.inventory.as_ref(),
        )
        .map_err(|e| (e, None))?;
        let inventory_ini = std::fs::read_to_string(&inventory_path).unwrap_or_default();

        // Step 6: optional tooling prep, best-effort.
        self.prepare_tooling(workspace.path()).await;

        // Step 7: credentials.
        let windows = targets_windows(&inventory_ini);
        let (mut environment, sudo_password, private_key_material) =
            self.resolve_credentials(windows).await;

        // Step 8: ssh key, ephemeral and scheduled for deletion on drop.
        let key_guard = private_key_material.as_ref().and_then(|material| {
            let path = workspace.path().join(".driftctl-ssh-key");
            match EphemeralFile::write(&path, material) {
                Ok(guard) => Some(guard),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to write ssh key material, proceeding without it");
                    None
                }
            }
        });

        let become_password_guard = sudo_password.as_ref().and_then(|password| {
            let path = workspace.path().join(".driftctl-become-password");
            match EphemeralFile::write(&path, password) {
                Ok(guard) => Some(guard),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to write escalation password, proceeding without it");
                    None
                }
            }
        });

        // Step 9: target filter.
        let target_hosts = job
            .target_hosts
            .clone()
            .or_else(|| default_target(&inventory_ini));

        for (key, value) in &job.environment {
            environment.insert(key.clone(), value.clone());
        }

        // Step 10: invoke the runner.
        let request = RunnerRequest {
            playbook_path: workspace.path().join(&job.playbook_path),
            inventory_path,
            target_hosts,
            private_key_path: key_guard.as_ref().map(|g| g.path().to_path_buf()),
            become_password_file: become_password_guard.as_ref().map(|g| g.path().to_path_buf()),
            become_method: become_password_guard.as_ref().map(|_| BecomeMethod::for_targets(windows)),
            mode: RunMode::Apply,
            environment,
        };

        let result = self.runner.run(&request).await.map_err(|e| (e, None))?;

        if !result.exit_ok {
            let err = CoreError::runner_failure(format!(
                "runner exited with failure status ({} failed task(s))",
                result.tasks.iter().filter(|t| t.status == driftctl_runner::TaskStatus::Failed).count()
            ));
            return Err((err, Some(result)));
        }

        let file_hash = hash_file(&workspace.path().join(&job.playbook_path));
        let playbook_commit = driftctl_workspace::query_head_commit(&clone_url, &job.runbook_ref)
            .await
            .ok();

        Ok((result, file_hash, playbook_commit))
    }

    async fn prepare_tooling(&self, workspace: &Path) {
        let example = workspace.join("ansible.cfg.example");
        let target = workspace.join("ansible.cfg");
        if example.exists() && !target.exists() {
            if let Err(e) = std::fs::copy(&example, &target) {
                tracing::warn!(error = %e, "failed to copy ansible.cfg.example, proceeding without it");
            }
        }

        let requirements = workspace.join("collections").join("requirements.yml");
        if requirements.exists() {
            let outcome = tokio::process::Command::new("runner")
                .arg("collection")
                .arg("install")
                .arg("-r")
                .arg(&requirements)
                .output()
                .await;
            match outcome {
                Ok(output) if !output.status.success() => {
                    tracing::warn!(
                        stderr = %String::from_utf8_lossy(&output.stderr),
                        "collection install reported failure, proceeding anyway",
                    );
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to spawn collection install, proceeding anyway");
                }
                Ok(_) => {}
            }
        }
    }

    /// Resolve host credentials for this job's target platform. Returns
    /// (environment variables to set, escalation password if any, private
    /// key material if any). Missing secrets are logged and treated as
    /// absent rather than job-failing (spec.md §7, "missing SSH key
    /// material ... logged and the job proceeds").
    async fn resolve_credentials(
        &self,
        windows: bool,
    ) -> (HashMap<String, String>, Option<String>, Option<String>) {
        let mut environment = HashMap::new();
        let mut sudo_password = None;

        if windows {
            match self.secrets.get(WINRM_CREDENTIALS_PATH).await {
                Ok(bundle) => {
                    if let Some(user) = bundle.get("username") {
                        environment.insert("ANSIBLE_USER".to_string(), user.to_string());
                    }
                    if let Some(password) = bundle.get("password") {
                        environment.insert("ANSIBLE_PASSWORD".to_string(), password.to_string());
                    }
                    environment.insert("ANSIBLE_WINRM_TRANSPORT".to_string(), "ntlm".to_string());
                    sudo_password = bundle.get("runas_password").map(str::to_string);
                }
                Err(e) => tracing::warn!(error = %e, "winrm credentials unavailable, proceeding without them"),
            }
        } else {
            match self.secrets.get(POSIX_CREDENTIALS_PATH).await {
                Ok(bundle) => {
                    if let Some(user) = bundle.get("username") {
                        environment.insert("ANSIBLE_USER".to_string(), user.to_string());
                    }
                    if let Some(password) = bundle.get("password") {
                        environment.insert("ANSIBLE_PASSWORD".to_string(), password.to_string());
                    }
                    sudo_password = bundle.get("sudo_password").map(str::to_string);
                }
                Err(e) => tracing::warn!(error = %e, "host credentials unavailable, proceeding without them"),
            }
        }

        let private_key = match self.secrets.get(SSH_KEY_PATH).await {
            Ok(bundle) => bundle.get("private_key").map(str::to_string),
            Err(e) => {
                tracing::warn!(error = %e, "ssh key material unavailable, proceeding without it");
                None
            }
        };

        (environment, sudo_password, private_key)
    }

    fn record_reconciliation(
        &self,
        job: &Job,
        status: RunStatus,
        file_hash: Option<String>,
        playbook_commit: Option<String>,
    ) {
        let key = PlaybookKey::new(&job.repository_url, &job.playbook_path);
        let previous = self.drift_state.get(&key.as_map_key());

        let state = PlaybookState {
            repository_url: job.repository_url.clone(),
            playbook_path: job.playbook_path.clone(),
            last_run: self.clock.epoch_ms(),
            last_hash: file_hash.or_else(|| previous.as_ref().map(|p| p.last_hash.clone())).unwrap_or_default(),
            last_status: status,
            last_remediation_time: previous.as_ref().and_then(|p| p.last_remediation_time),
            last_remediation_status: previous.as_ref().and_then(|p| p.last_remediation_status),
            drift_detected: previous.as_ref().map(|p| p.drift_detected).unwrap_or(false),
            playbook_commit: playbook_commit.or_else(|| previous.as_ref().and_then(|p| p.playbook_commit.clone())),
            target_hosts: job.target_hosts.clone(),
            branch: job.runbook_ref.clone(),
            error: None,
        };

        if let Err(e) = self.drift_state.update(key.as_map_key(), state) {
            tracing::warn!(error = %e, "failed to persist reconciliation state");
        }
    }
}

fn hash_file(path: &Path) -> Option<String> {
    let bytes = std::fs::read(path).ok()?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Some(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
