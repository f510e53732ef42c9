// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Intake payload for submitting a playbook run.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::CoreError;

static HTTPS_GIT_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https://[\w.@:/\-~]+\.git$").expect("static regex is valid"));

/// Request body for `POST /api/playbook/run`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybookRequest {
    pub repository_url: String,
    pub playbook_path: String,
    #[serde(default)]
    pub inventory: Option<HashMap<String, HashMap<String, String>>>,
    #[serde(default)]
    pub target_hosts: Option<String>,
    #[serde(default)]
    pub environment: HashMap<String, String>,
    #[serde(default)]
    pub secrets: HashMap<String, String>,
}

impl PlaybookRequest {
    /// Validate per spec.md §6: `repository_url` must be an HTTPS git URL
    /// ending in `.git`; `playbook_path` must be non-empty.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !HTTPS_GIT_URL.is_match(&self.repository_url) {
            return Err(CoreError::BadRequest(format!(
                "repository_url must be an https:// URL ending in .git, got {:?}",
                self.repository_url
            )));
        }
        if self.playbook_path.trim().is_empty() {
            return Err(CoreError::BadRequest("playbook_path must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "playbook_tests.rs"]
mod tests;
