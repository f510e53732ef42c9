// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn kind_is_stable_and_snake_case() {
    assert_eq!(CoreError::QueueFull.kind(), "queue_full");
    assert_eq!(CoreError::BadRequest("x".into()).kind(), "bad_request");
    assert_eq!(CoreError::inventory_missing("x").kind(), "inventory_missing");
    assert_eq!(CoreError::workspace_failure("x").kind(), "workspace_failure");
    assert_eq!(CoreError::auth_failed("x").kind(), "auth_failed");
    assert_eq!(CoreError::CloneFailed("x".into()).kind(), "clone_failed");
    assert_eq!(CoreError::secret_unavailable("x").kind(), "secret_unavailable");
    assert_eq!(CoreError::runner_failure("x").kind(), "runner_failure");
    assert_eq!(CoreError::state_failure("x").kind(), "state_failure");
    assert_eq!(CoreError::Timeout("x".into()).kind(), "timeout");
}

#[test]
fn job_error_string_prefixes_kind() {
    let err = CoreError::inventory_missing("inventory/hosts.ini not found");
    let rendered = job_error_string(&err);
    assert!(rendered.starts_with("inventory_missing:"));
    assert!(rendered.contains("inventory/hosts.ini not found"));
}

#[test]
fn source_is_preserved_when_constructed_with_with() {
    use std::error::Error as _;
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let err = CoreError::state_failure_with("reading state.json: missing", io_err);
    assert!(err.source().is_some());
}
