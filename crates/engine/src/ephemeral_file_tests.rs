// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
#[cfg(unix)]
fn write_creates_file_with_mode_0600() {
    use std::os::unix::fs::PermissionsExt;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("key");
    let guard = EphemeralFile::write(&path, "secret-material").unwrap();

    let mode = std::fs::metadata(guard.path()).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
    assert_eq!(std::fs::read_to_string(guard.path()).unwrap(), "secret-material");
}

#[test]
fn dropping_the_guard_removes_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("key");
    let guard = EphemeralFile::write(&path, "secret-material").unwrap();
    drop(guard);
    assert!(!path.exists());
}
