// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace Provisioner (C3).
//!
//! Shells out to the `git` binary rather than linking `git2`, matching the
//! daemon's own pattern for worktree management. Teardown is an RAII guard
//! so the directory is removed on every exit path, including panics.

use crate::subprocess::run_with_timeout;
use driftctl_core::error::CoreError;
use driftctl_core::mask::mask_url;
use driftctl_core::workspace::WorkspaceId;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

const DEFAULT_CLONE_TIMEOUT: Duration = Duration::from_secs(120);

/// An ephemeral, exclusively-owned workspace directory. Removed from disk
/// when dropped — satisfies spec.md §8's "Workspace closure" invariant
/// regardless of how the owning operation exits.
pub struct WorkspaceGuard {
    pub id: WorkspaceId,
    path: PathBuf,
}

impl WorkspaceGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WorkspaceGuard {
    fn drop(&mut self) {
        if self.path.exists() {
            if let Err(e) = std::fs::remove_dir_all(&self.path) {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to remove workspace directory"
                );
            }
        }
    }
}

pub struct WorkspaceProvisioner {
    root: PathBuf,
    clone_timeout: Duration,
}

impl WorkspaceProvisioner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), clone_timeout: DEFAULT_CLONE_TIMEOUT }
    }

    pub fn with_clone_timeout(mut self, timeout: Duration) -> Self {
        self.clone_timeout = timeout;
        self
    }

    /// Create a fresh directory and perform a shallow clone of
    /// `clone_url` (already token-embedded, if applicable) at `git_ref`.
    /// `repository_url` is the un-embedded URL, used only for masked
    /// logging (spec.md §4.3: "masks the token when echoing the URL").
    pub async fn provision(
        &self,
        repository_url: &str,
        git_ref: &str,
        clone_url: &str,
    ) -> Result<WorkspaceGuard, CoreError> {
        let id = WorkspaceId::new();
        let dir = self.root.join(id.as_str());

        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            let message = format!("creating {}: {e}", self.root.display());
            CoreError::workspace_failure_with(message, e)
        })?;

        tracing::info!(
            workspace_id = %id,
            repository = %mask_url(repository_url),
            git_ref,
            "cloning repository",
        );

        let mut cmd = Command::new("git");
        cmd.args([
            "clone",
            "--depth",
            "1",
            "--branch",
            git_ref,
            clone_url,
        ])
        .arg(&dir)
        .env_remove("GIT_DIR")
        .env_remove("GIT_WORK_TREE");

        let output = run_with_timeout(cmd, self.clone_timeout, "git clone").await.map_err(|e| {
            let _ = std::fs::remove_dir_all(&dir);
            e
        })?;

        if !output.status.success() {
            let _ = std::fs::remove_dir_all(&dir);
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CoreError::CloneFailed(mask_url(stderr.trim())));
        }

        Ok(WorkspaceGuard { id, path: dir })
    }
}

#[cfg(test)]
#[path = "provisioner_tests.rs"]
mod tests;
