// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drift State Store (C9): a single JSON file, keyed by
//! `PlaybookKey::as_map_key()`, written atomically via temp-file-then-rename.
//!
//! The whole `load -> mutate -> save` cycle is guarded by one mutex per
//! spec.md §5 ("a single mutex around load -> mutate -> save"); each
//! reconciliation cycle reads once at start and writes at most once at end.

use driftctl_core::error::CoreError;
use driftctl_core::playbook_state::PlaybookState;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct DriftStateStore {
    path: PathBuf,
    state: Mutex<HashMap<String, PlaybookState>>,
}

impl DriftStateStore {
    /// Load `path` if it exists (an empty map otherwise) and hold it in
    /// memory behind a mutex for the lifetime of the store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let path = path.into();
        let state = if path.exists() {
            read_map(&path)?
        } else {
            HashMap::new()
        };
        Ok(Self { path, state: Mutex::new(state) })
    }

    pub fn get(&self, key: &str) -> Option<PlaybookState> {
        self.state.lock().get(key).cloned()
    }

    pub fn list(&self) -> HashMap<String, PlaybookState> {
        self.state.lock().clone()
    }

    /// Insert or replace the entry for `key` and persist the whole map.
    pub fn update(&self, key: String, value: PlaybookState) -> Result<(), CoreError> {
        let mut guard = self.state.lock();
        guard.insert(key, value);
        write_map(&self.path, &guard)
    }

    pub fn delete(&self, key: &str) -> Result<(), CoreError> {
        let mut guard = self.state.lock();
        guard.remove(key);
        write_map(&self.path, &guard)
    }
}

fn read_map(path: &Path) -> Result<HashMap<String, PlaybookState>, CoreError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        let message = format!("reading {}: {e}", path.display());
        CoreError::state_failure_with(message, e)
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        let message = format!("parsing {}: {e}", path.display());
        CoreError::state_failure_with(message, e)
    })
}

/// Write `map` to `path` atomically: serialize to a temp file in the same
/// directory, then rename over the target. A crash mid-write never leaves a
/// truncated or partially-written state file.
fn write_map(path: &Path, map: &HashMap<String, PlaybookState>) -> Result<(), CoreError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(|e| {
        let message = format!("creating {}: {e}", dir.display());
        CoreError::state_failure_with(message, e)
    })?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
        let message = format!("creating temp file: {e}");
        CoreError::state_failure_with(message, e)
    })?;
    let json = serde_json::to_string_pretty(map).map_err(|e| {
        let message = format!("serializing drift state: {e}");
        CoreError::state_failure_with(message, e)
    })?;
    tmp.write_all(json.as_bytes()).map_err(|e| {
        let message = format!("writing temp file: {e}");
        CoreError::state_failure_with(message, e)
    })?;
    tmp.flush().map_err(|e| {
        let message = format!("flushing temp file: {e}");
        CoreError::state_failure_with(message, e)
    })?;
    tmp.persist(path).map_err(|e| {
        let message = format!("renaming into {}: {e}", path.display());
        CoreError::state_failure_with(message, e)
    })?;
    Ok(())
}

#[cfg(test)]
#[path = "drift_state_tests.rs"]
mod tests;
