// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared subprocess-with-timeout helper, the same shape the daemon uses
//! around its own `git worktree` calls.

use driftctl_core::error::CoreError;
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    label: &str,
) -> Result<Output, CoreError> {
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => {
            let message = format!("{label} failed to spawn: {e}");
            Err(CoreError::workspace_failure_with(message, e))
        }
        Err(_) => Err(CoreError::Timeout(format!("{label} timed out after {timeout:?}"))),
    }
}
