// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use async_trait::async_trait;
use driftctl_core::credential::CredentialBundle;
use driftctl_core::error::CoreError;
use std::collections::HashMap;

struct FakeSecrets {
    bundle: Option<CredentialBundle>,
}

#[async_trait]
impl SecretSource for FakeSecrets {
    async fn get(&self, _path: &str) -> Result<CredentialBundle, CoreError> {
        self.bundle.clone().ok_or_else(|| CoreError::secret_unavailable("service/config"))
    }
}

#[tokio::test]
async fn overlays_all_fields_when_present_and_parseable() {
    let bundle = CredentialBundle::new(HashMap::from([
        ("port".to_string(), "9090".to_string()),
        ("worker_count".to_string(), "8".to_string()),
        ("rate_limit".to_string(), "50".to_string()),
    ]));
    let secrets = FakeSecrets { bundle: Some(bundle) };
    let mut config = Config::default();

    apply_secret_overrides(&mut config, &secrets).await;

    assert_eq!(config.http_port, 9090);
    assert_eq!(config.worker_count, 8);
    assert_eq!(config.rate_limit_per_second, 50);
}

#[tokio::test]
async fn leaves_defaults_when_secret_path_is_unavailable() {
    let secrets = FakeSecrets { bundle: None };
    let mut config = Config::default();
    let before = config.clone();

    apply_secret_overrides(&mut config, &secrets).await;

    assert_eq!(config, before);
}

#[tokio::test]
async fn leaves_field_untouched_when_its_value_is_unparseable() {
    let bundle = CredentialBundle::new(HashMap::from([("port".to_string(), "not-a-port".to_string())]));
    let secrets = FakeSecrets { bundle: Some(bundle) };
    let mut config = Config::default();
    let default_port = config.http_port;

    apply_secret_overrides(&mut config, &secrets).await;

    assert_eq!(config.http_port, default_port);
}

#[tokio::test]
async fn partial_bundle_only_overlays_the_fields_it_carries() {
    let bundle = CredentialBundle::new(HashMap::from([("worker_count".to_string(), "16".to_string())]));
    let secrets = FakeSecrets { bundle: Some(bundle) };
    let mut config = Config::default();
    let default_port = config.http_port;
    let default_rate_limit = config.rate_limit_per_second;

    apply_secret_overrides(&mut config, &secrets).await;

    assert_eq!(config.worker_count, 16);
    assert_eq!(config.http_port, default_port);
    assert_eq!(config.rate_limit_per_second, default_rate_limit);
}
