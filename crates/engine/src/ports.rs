// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Seams between the Orchestrator/Drift Detector and C1/C2/C3, so tests can
//! swap in fakes (SPEC_FULL.md §8) without touching the network or
//! spawning real subprocesses.

use async_trait::async_trait;
use driftctl_core::clock::Clock;
use driftctl_core::credential::{CredentialBundle, RepoAuthToken};
use driftctl_core::error::CoreError;
use std::path::Path;

#[async_trait]
pub trait SecretSource: Send + Sync {
    async fn get(&self, path: &str) -> Result<CredentialBundle, CoreError>;
}

#[async_trait]
impl<C: Clock> SecretSource for driftctl_secrets::SecretResolver<C> {
    async fn get(&self, path: &str) -> Result<CredentialBundle, CoreError> {
        driftctl_secrets::SecretResolver::get(self, path).await
    }
}

#[async_trait]
pub trait AuthMinter: Send + Sync {
    async fn mint(
        &self,
        app_id: &str,
        installation_id: &str,
        private_key_pem: &str,
    ) -> Result<RepoAuthToken, CoreError>;
}

#[async_trait]
impl<C: Clock> AuthMinter for driftctl_secrets::RepoAuthMinter<C> {
    async fn mint(
        &self,
        app_id: &str,
        installation_id: &str,
        private_key_pem: &str,
    ) -> Result<RepoAuthToken, CoreError> {
        driftctl_secrets::RepoAuthMinter::mint(self, app_id, installation_id, private_key_pem).await
    }
}

/// A provisioned, exclusively-owned workspace directory. Implemented by
/// `driftctl_workspace::WorkspaceGuard` in production; fakes in tests keep
/// a `tempfile::TempDir` alive for the same lifetime.
pub trait ProvisionedWorkspace: Send + Sync {
    fn path(&self) -> &Path;
}

impl ProvisionedWorkspace for driftctl_workspace::WorkspaceGuard {
    fn path(&self) -> &Path {
        driftctl_workspace::WorkspaceGuard::path(self)
    }
}

#[async_trait]
pub trait WorkspaceSource: Send + Sync {
    async fn provision(
        &self,
        repository_url: &str,
        git_ref: &str,
        clone_url: &str,
    ) -> Result<Box<dyn ProvisionedWorkspace>, CoreError>;
}

#[async_trait]
impl WorkspaceSource for driftctl_workspace::WorkspaceProvisioner {
    async fn provision(
        &self,
        repository_url: &str,
        git_ref: &str,
        clone_url: &str,
    ) -> Result<Box<dyn ProvisionedWorkspace>, CoreError> {
        let guard = driftctl_workspace::WorkspaceProvisioner::provision(
            self,
            repository_url,
            git_ref,
            clone_url,
        )
        .await?;
        Ok(Box::new(guard))
    }
}
