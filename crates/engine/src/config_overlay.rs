// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Secret-store configuration overlay (spec.md §6): `service/*` fields
//! take precedence over environment variables and built-in defaults.

use crate::ports::SecretSource;
use driftctl_core::config::Config;

const SERVICE_CONFIG_PATH: &str = "service/config";

/// Overlays `port`, `worker_count`, and `rate_limit` from the secret store
/// onto `config` when present and parseable. `config` is expected to
/// already carry the environment/defaults layer; a missing secret path,
/// an unreachable secret store, or an unparseable field value leaves the
/// corresponding field untouched rather than failing startup.
pub async fn apply_secret_overrides(config: &mut Config, secrets: &dyn SecretSource) {
    let bundle = match secrets.get(SERVICE_CONFIG_PATH).await {
        Ok(bundle) => bundle,
        Err(e) => {
            tracing::debug!(error = %e, "service config secret unavailable, using environment/defaults");
            return;
        }
    };

    if let Some(port) = bundle.get("port").and_then(|v| v.parse().ok()) {
        config.http_port = port;
    }
    if let Some(worker_count) = bundle.get("worker_count").and_then(|v| v.parse().ok()) {
        config.worker_count = worker_count;
    }
    if let Some(rate_limit) = bundle.get("rate_limit").and_then(|v| v.parse().ok()) {
        config.rate_limit_per_second = rate_limit;
    }
}

#[cfg(test)]
#[path = "config_overlay_tests.rs"]
mod tests;
