// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identifier and state machine.

use crate::clock::Clock;
use crate::id::MonotonicCounter;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Unique, monotonically-increasing identifier for a job instance.
///
/// Unlike the other ids in this crate (`WorkspaceId`, ...), job ids are not
/// random: they render as `job-<n>` so operators can read submission order
/// at a glance and the HTTP surface's `job_id` field stays predictable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(u64);

static JOB_ID_COUNTER: MonotonicCounterCell = MonotonicCounterCell::new();

// A tiny wrapper so the counter can live in a `static` without `once_cell`
// machinery; `MonotonicCounter` is itself just an `AtomicU64`.
struct MonotonicCounterCell(MonotonicCounter);

impl MonotonicCounterCell {
    const fn new() -> Self {
        Self(MonotonicCounter::new())
    }
}

impl JobId {
    /// Allocate the next job id for this process.
    pub fn next() -> Self {
        Self(JOB_ID_COUNTER.0.next())
    }

    /// Parse a job id previously rendered by `Display` (`job-<n>`).
    pub fn from_string(s: impl AsRef<str>) -> Option<Self> {
        let s = s.as_ref();
        let suffix = s.strip_prefix("job-")?;
        suffix.parse::<u64>().ok().map(Self)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

/// Lifecycle status of a [`Job`].
///
/// Transitions only as `Queued -> Running -> {Completed | Failed}`; no
/// other transition is valid (see `Job::transition_to`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

crate::simple_display! {
    JobStatus {
        Queued => "queued",
        Running => "running",
        Completed => "completed",
        Failed => "failed",
    }
}

/// Error raised when an illegal status transition is attempted.
///
/// The orchestrator is the only writer of `Job::status`; this exists so a
/// bug there fails loudly in tests rather than silently corrupting state.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("illegal job transition: {from} -> {to}")]
pub struct IllegalTransition {
    pub from: JobStatus,
    pub to: JobStatus,
}

/// Inputs captured at submission time, shared by the original job and any
/// retries created from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub repository_url: String,
    pub playbook_path: String,
    pub target_hosts: Option<String>,
    pub inventory: Option<HashMap<String, HashMap<String, String>>>,
    pub environment: HashMap<String, String>,
    pub secrets: HashMap<String, String>,
    /// Git ref cloned for this run. Defaults to `"main"` when the request
    /// does not specify one (see SPEC_FULL.md Open Question #1).
    pub runbook_ref: String,
    pub retry_count: u32,
}

impl JobConfig {
    pub fn builder(repository_url: impl Into<String>, playbook_path: impl Into<String>) -> JobConfigBuilder {
        JobConfigBuilder {
            repository_url: repository_url.into(),
            playbook_path: playbook_path.into(),
            target_hosts: None,
            inventory: None,
            environment: HashMap::new(),
            secrets: HashMap::new(),
            runbook_ref: "main".to_string(),
            retry_count: 0,
        }
    }
}

pub struct JobConfigBuilder {
    repository_url: String,
    playbook_path: String,
    target_hosts: Option<String>,
    inventory: Option<HashMap<String, HashMap<String, String>>>,
    environment: HashMap<String, String>,
    secrets: HashMap<String, String>,
    runbook_ref: String,
    retry_count: u32,
}

impl JobConfigBuilder {
    crate::setters! {
        into {
            runbook_ref: String,
        }
        set {
            environment: HashMap<String, String>,
            secrets: HashMap<String, String>,
            retry_count: u32,
        }
        option {
            target_hosts: String,
        }
    }

    pub fn inventory(mut self, inventory: HashMap<String, HashMap<String, String>>) -> Self {
        self.inventory = Some(inventory);
        self
    }

    pub fn build(self) -> JobConfig {
        JobConfig {
            repository_url: self.repository_url,
            playbook_path: self.playbook_path,
            target_hosts: self.target_hosts,
            inventory: self.inventory,
            environment: self.environment,
            secrets: self.secrets,
            runbook_ref: self.runbook_ref,
            retry_count: self.retry_count,
        }
    }
}

/// A single job execution.
///
/// Owned exclusively by the Job Store; mutated only by the worker that
/// picked it up, or by the intake path that created it. See
/// `driftctl-engine`'s orchestrator for the state machine driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    /// Epoch milliseconds; always non-zero.
    pub start_time: u64,
    /// Epoch milliseconds; zero iff `status` is `Queued` or `Running`.
    pub end_time: u64,
    pub output: String,
    pub error: Option<String>,
    pub repository_url: String,
    pub playbook_path: String,
    pub target_hosts: Option<String>,
    pub inventory: Option<HashMap<String, HashMap<String, String>>>,
    pub runbook_ref: String,
    pub retry_count: u32,
}

impl Job {
    /// Create a new job in `Queued` status.
    pub fn new(config: JobConfig, clock: &impl Clock) -> Self {
        Self {
            id: JobId::next(),
            status: JobStatus::Queued,
            start_time: clock.epoch_ms(),
            end_time: 0,
            output: String::new(),
            error: None,
            repository_url: config.repository_url,
            playbook_path: config.playbook_path,
            target_hosts: config.target_hosts,
            inventory: config.inventory,
            runbook_ref: config.runbook_ref,
            retry_count: config.retry_count,
        }
    }

    /// Build a `JobConfig` that would recreate this job's request fields,
    /// with `retry_count` bumped by one. Used by the retry endpoint.
    pub fn retry_config(&self) -> JobConfig {
        JobConfig {
            repository_url: self.repository_url.clone(),
            playbook_path: self.playbook_path.clone(),
            target_hosts: self.target_hosts.clone(),
            inventory: self.inventory.clone(),
            environment: HashMap::new(),
            secrets: HashMap::new(),
            runbook_ref: self.runbook_ref.clone(),
            retry_count: self.retry_count + 1,
        }
    }

    /// Move to `Running`. Only valid from `Queued`.
    pub fn start_running(&mut self) -> Result<(), IllegalTransition> {
        self.transition_to(JobStatus::Running)
    }

    /// Move to a terminal status (`Completed` or `Failed`). Only valid from
    /// `Running`. Sets `end_time` from the clock.
    pub fn finish(
        &mut self,
        status: JobStatus,
        output: String,
        error: Option<String>,
        clock: &impl Clock,
    ) -> Result<(), IllegalTransition> {
        debug_assert!(status.is_terminal());
        self.transition_to(status)?;
        self.end_time = clock.epoch_ms();
        self.output = output;
        self.error = error;
        Ok(())
    }

    fn transition_to(&mut self, to: JobStatus) -> Result<(), IllegalTransition> {
        let allowed = matches!(
            (self.status, to),
            (JobStatus::Queued, JobStatus::Running)
                | (JobStatus::Running, JobStatus::Completed)
                | (JobStatus::Running, JobStatus::Failed)
        );
        if !allowed {
            return Err(IllegalTransition { from: self.status, to });
        }
        self.status = to;
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Job {
    /// Build a job with test defaults, in `Queued` status.
    pub fn for_test(repository_url: &str, playbook_path: &str) -> Self {
        let config = JobConfig::builder(repository_url, playbook_path).build();
        Self::new(config, &crate::clock::FakeClock::new())
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
