// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote-ref query used by the Drift Detector to learn the upstream HEAD
//! commit for a branch without cloning (spec.md §4.10 step 1).

use crate::subprocess::run_with_timeout;
use driftctl_core::error::CoreError;
use driftctl_core::mask::mask_url;
use std::time::Duration;
use tokio::process::Command;

const REMOTE_REF_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolves `branch`'s current commit id at `clone_url` via `git ls-remote`.
/// Hard 30-second timeout per spec.md §5; failures are the caller's to
/// treat as non-fatal ("commit unknown").
pub async fn query_head_commit(clone_url: &str, branch: &str) -> Result<String, CoreError> {
    let mut cmd = Command::new("git");
    cmd.args(["ls-remote", clone_url, branch]);

    let output = run_with_timeout(cmd, REMOTE_REF_TIMEOUT, "git ls-remote").await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CoreError::workspace_failure(format!("ls-remote failed: {}", mask_url(stderr.trim()))));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().next())
        .map(str::to_string)
        .ok_or_else(|| CoreError::workspace_failure(format!("no ref found for branch {branch}")))
}

#[cfg(test)]
#[path = "remote_ref_tests.rs"]
mod tests;
