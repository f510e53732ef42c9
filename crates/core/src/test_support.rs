// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test fixtures for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::clock::FakeClock;
use crate::job::{Job, JobConfig};
use crate::playbook_state::{PlaybookState, RunStatus};
use std::collections::HashMap;

pub const TEST_REPOSITORY_URL: &str = "https://example.com/acme/playbooks.git";
pub const TEST_PLAYBOOK_PATH: &str = "playbooks/site.yml";

/// A queued job with test-default fields, created against a fresh
/// [`FakeClock`].
pub fn sample_job() -> Job {
    let config = JobConfig::builder(TEST_REPOSITORY_URL, TEST_PLAYBOOK_PATH).build();
    Job::new(config, &FakeClock::new())
}

/// A job config carrying one target host and one inventory group.
pub fn sample_job_config() -> JobConfig {
    let mut group = HashMap::new();
    group.insert("ansible_host".to_string(), "10.0.0.1".to_string());
    let mut inventory = HashMap::new();
    inventory.insert("web".to_string(), group);

    JobConfig::builder(TEST_REPOSITORY_URL, TEST_PLAYBOOK_PATH)
        .target_hosts("web")
        .inventory(inventory)
        .build()
}

/// A clean `PlaybookState` as it would look immediately after a successful
/// first run, with no drift detected yet.
pub fn sample_playbook_state() -> PlaybookState {
    PlaybookState {
        repository_url: TEST_REPOSITORY_URL.to_string(),
        playbook_path: TEST_PLAYBOOK_PATH.to_string(),
        last_run: 1_700_000_000_000,
        last_hash: "deadbeefcafe".to_string(),
        last_status: RunStatus::Ok,
        last_remediation_time: None,
        last_remediation_status: None,
        drift_detected: false,
        playbook_commit: Some("abc123".to_string()),
        target_hosts: Some("web".to_string()),
        branch: "main".to_string(),
        error: None,
    }
}
