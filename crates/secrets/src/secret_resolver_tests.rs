// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use driftctl_core::clock::FakeClock;
use std::sync::atomic::{AtomicUsize, Ordering};

struct FakeBackend {
    handshakes: AtomicUsize,
    ttl_ms: u64,
}

#[async_trait]
impl SecretBackend for FakeBackend {
    async fn handshake(&self) -> Result<SessionToken, CoreError> {
        let n = self.handshakes.fetch_add(1, Ordering::SeqCst);
        Ok(SessionToken { token: format!("session-{n}"), expires_at_ms: self.ttl_ms })
    }

    async fn fetch(
        &self,
        session_token: &str,
        path: &str,
    ) -> Result<HashMap<String, String>, CoreError> {
        if path == "missing/path" {
            return Err(CoreError::secret_unavailable(path.to_string()));
        }
        let mut fields = HashMap::new();
        fields.insert("session".to_string(), session_token.to_string());
        fields.insert("path".to_string(), path.to_string());
        Ok(fields)
    }
}

#[tokio::test]
async fn first_get_performs_a_handshake() {
    let backend = Arc::new(FakeBackend { handshakes: AtomicUsize::new(0), ttl_ms: 1_000_000 });
    let resolver = SecretResolver::new(backend.clone(), FakeClock::new());
    let bundle = resolver.get("runner/credentials").await.unwrap();
    assert_eq!(bundle.get("session"), Some("session-0"));
    assert_eq!(backend.handshakes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn second_get_reuses_cached_session_before_expiry() {
    let clock = FakeClock::new();
    let backend = Arc::new(FakeBackend {
        handshakes: AtomicUsize::new(0),
        ttl_ms: clock.epoch_ms() + 60_000,
    });
    let resolver = SecretResolver::new(backend.clone(), clock);
    resolver.get("a").await.unwrap();
    resolver.get("b").await.unwrap();
    assert_eq!(backend.handshakes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn get_rehandshakes_once_the_session_expires() {
    let clock = FakeClock::new();
    let backend = Arc::new(FakeBackend {
        handshakes: AtomicUsize::new(0),
        ttl_ms: clock.epoch_ms(),
    });
    let resolver = SecretResolver::new(backend.clone(), clock.clone());
    resolver.get("a").await.unwrap();
    clock.advance(std::time::Duration::from_millis(1));
    resolver.get("b").await.unwrap();
    assert_eq!(backend.handshakes.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn fetch_failure_surfaces_as_secret_unavailable() {
    let backend = Arc::new(FakeBackend { handshakes: AtomicUsize::new(0), ttl_ms: 1_000_000 });
    let resolver = SecretResolver::new(backend, FakeClock::new());
    let err = resolver.get("missing/path").await.unwrap_err();
    assert!(matches!(err, CoreError::SecretUnavailable { .. }));
}
