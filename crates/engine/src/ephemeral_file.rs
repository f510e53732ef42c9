// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scoped helper for secret material that must touch disk (private keys,
//! escalation passwords): guarantees 0600 mode on creation and deletion on
//! every exit path (spec.md §9, "SSH-key and password files written to
//! disk").

use driftctl_core::error::CoreError;
use std::path::{Path, PathBuf};

pub struct EphemeralFile {
    path: PathBuf,
}

impl EphemeralFile {
    pub fn write(path: impl Into<PathBuf>, contents: &str) -> Result<Self, CoreError> {
        let path = path.into();
        write_with_mode(&path, contents)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for EphemeralFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to remove ephemeral file");
            }
        }
    }
}

#[cfg(unix)]
fn write_with_mode(path: &Path, contents: &str) -> Result<(), CoreError> {
    use std::fs::OpenOptions;
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
        .map_err(|e| {
            let message = format!("creating {}: {e}", path.display());
            CoreError::workspace_failure_with(message, e)
        })?;
    file.write_all(contents.as_bytes()).map_err(|e| {
        let message = format!("writing {}: {e}", path.display());
        CoreError::workspace_failure_with(message, e)
    })
}

#[cfg(not(unix))]
fn write_with_mode(path: &Path, contents: &str) -> Result<(), CoreError> {
    std::fs::write(path, contents).map_err(|e| {
        let message = format!("writing {}: {e}", path.display());
        CoreError::workspace_failure_with(message, e)
    })
}

#[cfg(test)]
#[path = "ephemeral_file_tests.rs"]
mod tests;
