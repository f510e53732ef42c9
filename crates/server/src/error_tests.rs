// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn queue_full_maps_to_too_many_requests() {
    assert_eq!(status_for(&CoreError::QueueFull), StatusCode::TOO_MANY_REQUESTS);
}

#[test]
fn bad_request_maps_to_bad_request() {
    assert_eq!(status_for(&CoreError::BadRequest("bad url".to_string())), StatusCode::BAD_REQUEST);
}

#[test]
fn runner_failure_maps_to_internal_server_error() {
    assert_eq!(status_for(&CoreError::runner_failure("exit 2")), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn api_error_response_carries_the_kind_tag() {
    let response = ApiError(CoreError::inventory_missing("inventory/hosts.ini")).into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
