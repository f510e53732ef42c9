// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace identifier.
//!
//! A workspace is a filesystem directory with a uniquely-generated name,
//! owned by exactly one job or drift evaluation. The identifier is used
//! only for log correlation; the directory itself is owned and removed by
//! `driftctl-workspace`'s `WorkspaceGuard`.

crate::define_id! {
    /// Unique identifier for a provisioned workspace directory.
    pub struct WorkspaceId("wks-");
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
