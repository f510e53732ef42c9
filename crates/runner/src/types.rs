// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inputs and structured output for one runner invocation.

use std::collections::HashMap;
use std::path::PathBuf;

/// `apply` mutates hosts; `check` reports what would change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Apply,
    Check,
}

/// Which privilege-escalation flag the runner should emit alongside
/// `--become --become-password-file` (spec.md §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BecomeMethod {
    Sudo,
    Runas,
}

impl BecomeMethod {
    /// The value of `--become-method=`, e.g. `sudo` or `runas`.
    pub fn as_str(&self) -> &'static str {
        match self {
            BecomeMethod::Sudo => "sudo",
            BecomeMethod::Runas => "runas",
        }
    }

    /// Picks `runas` for Windows targets, `sudo` otherwise.
    pub fn for_targets(windows: bool) -> Self {
        if windows { BecomeMethod::Runas } else { BecomeMethod::Sudo }
    }
}

/// Everything the Runner Invoker needs to build one command line.
pub struct RunnerRequest {
    pub playbook_path: PathBuf,
    pub inventory_path: PathBuf,
    pub target_hosts: Option<String>,
    pub private_key_path: Option<PathBuf>,
    pub become_password_file: Option<PathBuf>,
    pub become_method: Option<BecomeMethod>,
    pub mode: RunMode,
    pub environment: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Ok,
    Changed,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    pub task_name: String,
    pub host: String,
    pub status: TaskStatus,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HostRecap {
    pub ok: u32,
    pub changed: u32,
    pub unreachable: u32,
    pub failed: u32,
    pub skipped: u32,
}

/// Structured summary of one runner invocation (spec.md §4.5).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerResult {
    pub exit_ok: bool,
    pub raw_stdout: String,
    pub raw_stderr: String,
    pub play_name: Option<String>,
    pub tasks: Vec<TaskOutcome>,
    pub recap: HashMap<String, HostRecap>,
    pub changed_total: u32,
}

impl RunnerResult {
    /// Non-zero exit in check mode with `changed_total > 0` means
    /// "would-change", not failure (spec.md §4.5, §9 Open Question #2).
    pub fn would_change(&self, mode: RunMode) -> bool {
        mode == RunMode::Check && self.changed_total > 0
    }
}
