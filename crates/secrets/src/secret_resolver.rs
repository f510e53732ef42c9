// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Secret Resolver (C1): one handshake, a cached session token, and
//! `get(path)` reads against a KV-style secret store.

use async_trait::async_trait;
use driftctl_core::clock::Clock;
use driftctl_core::credential::CredentialBundle;
use driftctl_core::error::CoreError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// A handshake-issued session token, good until `expires_at_ms`.
#[derive(Debug, Clone)]
pub struct SessionToken {
    pub token: String,
    pub expires_at_ms: u64,
}

/// Transport seam for the secret store, mockable in-process per
/// SPEC_FULL.md §4.1.
#[async_trait]
pub trait SecretBackend: Send + Sync {
    async fn handshake(&self) -> Result<SessionToken, CoreError>;
    async fn fetch(
        &self,
        session_token: &str,
        path: &str,
    ) -> Result<HashMap<String, String>, CoreError>;
}

/// `reqwest`-backed implementation talking to a KV-style secret store over
/// HTTPS using a role-id/secret-id handshake.
pub struct HttpSecretBackend {
    client: reqwest::Client,
    base_url: String,
    role_id: String,
    secret_id: String,
}

impl HttpSecretBackend {
    pub fn new(base_url: impl Into<String>, role_id: impl Into<String>, secret_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            role_id: role_id.into(),
            secret_id: secret_id.into(),
        }
    }
}

#[derive(serde::Deserialize)]
struct HandshakeResponse {
    token: String,
    expires_at_ms: u64,
}

#[async_trait]
impl SecretBackend for HttpSecretBackend {
    async fn handshake(&self) -> Result<SessionToken, CoreError> {
        let url = format!("{}/v1/auth/handshake", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "role_id": self.role_id, "secret_id": self.secret_id }))
            .send()
            .await
            .map_err(|e| {
                let message = format!("handshake request failed: {e}");
                CoreError::auth_failed_with(message, e)
            })?;

        if !resp.status().is_success() {
            return Err(CoreError::auth_failed(format!(
                "handshake rejected with status {}",
                resp.status()
            )));
        }

        let body: HandshakeResponse = resp.json().await.map_err(|e| {
            let message = format!("malformed handshake response: {e}");
            CoreError::auth_failed_with(message, e)
        })?;

        Ok(SessionToken { token: body.token, expires_at_ms: body.expires_at_ms })
    }

    async fn fetch(
        &self,
        session_token: &str,
        path: &str,
    ) -> Result<HashMap<String, String>, CoreError> {
        let url = format!("{}/v1/secrets/{}", self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(session_token)
            .send()
            .await
            .map_err(|e| {
                let message = format!("fetching {path}: {e}");
                CoreError::secret_unavailable_with(message, e)
            })?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(CoreError::secret_unavailable(format!("path not found: {path}")));
        }
        if !resp.status().is_success() {
            return Err(CoreError::secret_unavailable(format!(
                "fetching {path} failed with status {}",
                resp.status()
            )));
        }

        resp.json().await.map_err(|e| {
            let message = format!("malformed response for {path}: {e}");
            CoreError::secret_unavailable_with(message, e)
        })
    }
}

/// Caches the handshake's session token and re-handshakes once it expires.
/// Safe for concurrent use: the cache is guarded by a single mutex and reads
/// are idempotent (spec.md §4.1).
pub struct SecretResolver<C: Clock> {
    backend: Arc<dyn SecretBackend>,
    clock: C,
    session: Mutex<Option<SessionToken>>,
}

impl<C: Clock> SecretResolver<C> {
    pub fn new(backend: Arc<dyn SecretBackend>, clock: C) -> Self {
        Self { backend, clock, session: Mutex::new(None) }
    }

    pub async fn get(&self, path: &str) -> Result<CredentialBundle, CoreError> {
        let session_token = self.session_token().await?;
        let fields = self.backend.fetch(&session_token, path).await?;
        Ok(CredentialBundle::new(fields))
    }

    async fn session_token(&self) -> Result<String, CoreError> {
        let now = self.clock.epoch_ms();
        {
            let guard = self.session.lock();
            if let Some(session) = guard.as_ref() {
                if now < session.expires_at_ms {
                    return Ok(session.token.clone());
                }
            }
        }

        let fresh = self.backend.handshake().await?;
        let token = fresh.token.clone();
        *self.session.lock() = Some(fresh);
        Ok(token)
    }
}

#[cfg(test)]
#[path = "secret_resolver_tests.rs"]
mod tests;
