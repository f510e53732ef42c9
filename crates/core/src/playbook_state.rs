// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-known-playbook reconciliation record, owned by the Drift State Store.

use serde::{Deserialize, Serialize};

/// Identifies a playbook for drift tracking purposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaybookKey {
    pub repository_url: String,
    pub playbook_path: String,
}

impl PlaybookKey {
    pub fn new(repository_url: impl Into<String>, playbook_path: impl Into<String>) -> Self {
        Self { repository_url: repository_url.into(), playbook_path: playbook_path.into() }
    }

    /// Flattened string form used as the JSON map key in the drift state
    /// file (spec.md §6: "keyed by playbook path").
    pub fn as_map_key(&self) -> String {
        format!("{}::{}", self.repository_url, self.playbook_path)
    }
}

/// Reconciliation state for one playbook, updated by the Orchestrator on
/// every terminal job and by the Drift Detector on every evaluation cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybookState {
    pub repository_url: String,
    pub playbook_path: String,
    /// Epoch milliseconds of the most recent run (job or drift check).
    pub last_run: u64,
    /// Content digest (sha256 hex) of the playbook file at last successful run.
    pub last_hash: String,
    pub last_status: RunStatus,
    pub last_remediation_time: Option<u64>,
    pub last_remediation_status: Option<RunStatus>,
    pub drift_detected: bool,
    /// Upstream commit id observed at the last check, when resolvable.
    pub playbook_commit: Option<String>,
    pub target_hosts: Option<String>,
    /// Git ref evaluated by the Drift Detector (see SPEC_FULL.md Open
    /// Question #1: recorded at submission time and reused, rather than
    /// hard-coded to "main").
    pub branch: String,
    /// Set when a drift cycle could not complete for this entry (remote-ref
    /// query failure is NOT fatal per spec.md §7, but inventory-missing is).
    #[serde(default)]
    pub error: Option<String>,
}

/// Outcome of a runner invocation or drift evaluation, as recorded in
/// `PlaybookState`. Distinct from `JobStatus`: `Ok` covers both "no
/// changes" and "ignorable changes only".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Ok,
    Failed,
    Error,
}

crate::simple_display! {
    RunStatus {
        Ok => "ok",
        Failed => "failed",
        Error => "error",
    }
}

#[cfg(test)]
#[path = "playbook_state_tests.rs"]
mod tests;
