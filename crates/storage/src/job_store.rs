// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory Job Store (C6): a reader-writer-locked map keyed by job id.
//!
//! Restarts lose in-flight jobs; this is a documented trade-off, not an
//! oversight — see spec.md §4.6.

use driftctl_core::job::{Job, JobId};
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
pub struct JobStore {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, job: Job) {
        self.jobs.write().insert(job.id, job);
    }

    pub fn get(&self, id: JobId) -> Option<Job> {
        self.jobs.read().get(&id).cloned()
    }

    pub fn list(&self) -> HashMap<JobId, Job> {
        self.jobs.read().clone()
    }

    /// Apply `mutator` to the stored job in place. No-op if `id` is absent.
    pub fn update(&self, id: JobId, mutator: impl FnOnce(&mut Job)) {
        if let Some(job) = self.jobs.write().get_mut(&id) {
            mutator(job);
        }
    }
}

#[cfg(test)]
#[path = "job_store_tests.rs"]
mod tests;
