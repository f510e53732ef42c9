// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use driftctl_core::clock::FakeClock;

#[test]
fn claims_expire_exactly_ten_minutes_after_issued_at() {
    let claims = build_claims("app-1", 1_700_000_000);
    assert_eq!(claims.exp - claims.iat, 600);
    assert_eq!(claims.iss, "app-1");
}

#[tokio::test]
async fn mint_with_invalid_signing_key_fails_before_any_network_call() {
    let minter = RepoAuthMinter::new("https://example.com/installations/{installation_id}/tokens", FakeClock::new());
    let err = minter.mint("app-1", "inst-1", "not a pem key").await.unwrap_err();
    assert!(matches!(err, CoreError::AuthFailed { .. }));
}
