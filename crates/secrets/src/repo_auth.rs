// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repo-Auth Minter (C2): signs a short-lived JWT assertion and exchanges
//! it for an installation bearer token at the repository host.
//!
//! Never logs the private key or the minted token (spec.md §9, "Token-
//! bearing URLs in logs"); call sites that need to log anything about a
//! token log only its expiry.

use driftctl_core::clock::Clock;
use driftctl_core::credential::RepoAuthToken;
use driftctl_core::error::CoreError;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};

/// JWT lifetime per spec.md §4.2: `expires_at = issued_at + 10 min`.
const ASSERTION_TTL_SECS: i64 = 10 * 60;

#[derive(Serialize)]
struct Claims {
    iat: i64,
    exp: i64,
    iss: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
    expires_at_ms: u64,
}

fn build_claims(app_id: &str, iat: i64) -> Claims {
    Claims { iat, exp: iat + ASSERTION_TTL_SECS, iss: app_id.to_string() }
}

pub struct RepoAuthMinter<C: Clock> {
    client: reqwest::Client,
    token_endpoint_template: String,
    clock: C,
}

impl<C: Clock> RepoAuthMinter<C> {
    /// `token_endpoint_template` receives the installation id via a single
    /// `{installation_id}` placeholder, e.g.
    /// `https://api.github.example/app/installations/{installation_id}/access_tokens`.
    pub fn new(token_endpoint_template: impl Into<String>, clock: C) -> Self {
        Self { client: reqwest::Client::new(), token_endpoint_template: token_endpoint_template.into(), clock }
    }

    /// Build and sign the assertion, then exchange it for a bearer token.
    pub async fn mint(
        &self,
        app_id: &str,
        installation_id: &str,
        private_key_pem: &str,
    ) -> Result<RepoAuthToken, CoreError> {
        let issued_at_ms = self.clock.epoch_ms();
        let iat = (issued_at_ms / 1000) as i64;
        let claims = build_claims(app_id, iat);

        let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes()).map_err(|e| {
            let message = format!("invalid signing key: {e}");
            CoreError::auth_failed_with(message, e)
        })?;
        let assertion = encode(&Header::new(jsonwebtoken::Algorithm::RS256), &claims, &key).map_err(|e| {
            let message = format!("failed to sign assertion: {e}");
            CoreError::auth_failed_with(message, e)
        })?;

        let url = self.token_endpoint_template.replace("{installation_id}", installation_id);
        let resp = self.client.post(&url).bearer_auth(&assertion).send().await.map_err(|e| {
            let message = format!("token exchange request failed: {e}");
            CoreError::auth_failed_with(message, e)
        })?;

        if !resp.status().is_success() {
            return Err(CoreError::auth_failed(format!(
                "token exchange rejected with status {}",
                resp.status()
            )));
        }

        let body: TokenResponse = resp.json().await.map_err(|e| {
            let message = format!("malformed token exchange response: {e}");
            CoreError::auth_failed_with(message, e)
        })?;

        Ok(RepoAuthToken::new(body.token, issued_at_ms, body.expires_at_ms))
    }
}

#[cfg(test)]
#[path = "repo_auth_tests.rs"]
mod tests;
