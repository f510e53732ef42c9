// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Credential and token types passed from the secret layer (C1/C2) into a
//! single run invocation. Neither type is ever persisted or retained past
//! the scope of the run that requested it.

use std::collections::HashMap;

/// A named set of key-value fields fetched from the secret store for one
/// logical path (e.g. `runner/credentials`, `runner/winrm`).
///
/// Deliberately opaque to the core: callers look up fields by name and
/// pass them to the Runner Invoker without the core interpreting them.
#[derive(Clone)]
pub struct CredentialBundle {
    fields: HashMap<String, String>,
}

impl CredentialBundle {
    pub fn new(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }
}

impl std::fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print field values: a bundle may carry passwords or key
        // material and ends up in panic messages / log call sites.
        f.debug_struct("CredentialBundle")
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A short-lived bearer token minted by the Repo-Auth Minter (C2).
///
/// Carries its own expiry so callers (Workspace Provisioner, Drift
/// Detector's remote-ref query) can assert freshness without consulting
/// the minter again. Never serialized; never cached past one run.
#[derive(Clone)]
pub struct RepoAuthToken {
    token: String,
    pub issued_at_ms: u64,
    pub expires_at_ms: u64,
}

impl RepoAuthToken {
    pub fn new(token: String, issued_at_ms: u64, expires_at_ms: u64) -> Self {
        Self { token, issued_at_ms, expires_at_ms }
    }

    pub fn bearer(&self) -> &str {
        &self.token
    }

    pub fn is_fresh(&self, now_ms: u64) -> bool {
        now_ms < self.expires_at_ms
    }

    /// Embed the token as HTTP Basic userinfo in a clone URL, e.g.
    /// `https://x-access-token:<token>@github.com/acme/pb.git`.
    pub fn into_url(&self, repository_url: &str) -> Option<String> {
        let rest = repository_url.strip_prefix("https://")?;
        Some(format!("https://x-access-token:{}@{}", self.token, rest))
    }
}

impl std::fmt::Debug for RepoAuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepoAuthToken")
            .field("token", &"****")
            .field("issued_at_ms", &self.issued_at_ms)
            .field("expires_at_ms", &self.expires_at_ms)
            .finish()
    }
}

#[cfg(test)]
#[path = "credential_tests.rs"]
mod tests;
