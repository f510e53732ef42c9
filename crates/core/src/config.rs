// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Layered runtime configuration.
//!
//! `Config::from_env` resolves built-in defaults, then overlays
//! environment variables (`DRIFTCTL_*`). The top layer — secret-store
//! values read from `service/config` — takes precedence over both and is
//! applied afterward by `driftctl_engine::apply_secret_overrides`, since
//! fetching it requires the secret resolver constructed in `main.rs`
//! (SPEC_FULL.md §6: secret store > environment > defaults).

use std::env;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub http_port: u16,
    pub worker_count: usize,
    pub queue_capacity: usize,
    pub rate_limit_per_second: u32,
    pub drift_interval: Duration,
    pub drift_state_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_port: 8080,
            worker_count: 4,
            queue_capacity: 100,
            rate_limit_per_second: 10,
            drift_interval: Duration::from_secs(180),
            drift_state_path: std::env::temp_dir().join("default_system_state.json").to_string_lossy().into_owned(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

impl Config {
    /// Start from defaults, then overlay `DRIFTCTL_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(v) = read_env("DRIFTCTL_HTTP_PORT")? {
            config.http_port = parse_env("DRIFTCTL_HTTP_PORT", &v)?;
        }
        if let Some(v) = read_env("DRIFTCTL_WORKER_COUNT")? {
            config.worker_count = parse_env("DRIFTCTL_WORKER_COUNT", &v)?;
        }
        if let Some(v) = read_env("DRIFTCTL_QUEUE_CAPACITY")? {
            config.queue_capacity = parse_env("DRIFTCTL_QUEUE_CAPACITY", &v)?;
        }
        if let Some(v) = read_env("DRIFTCTL_RATE_LIMIT_PER_SECOND")? {
            config.rate_limit_per_second = parse_env("DRIFTCTL_RATE_LIMIT_PER_SECOND", &v)?;
        }
        if let Some(v) = read_env("DRIFTCTL_DRIFT_INTERVAL_SECS")? {
            let secs: u64 = parse_env("DRIFTCTL_DRIFT_INTERVAL_SECS", &v)?;
            config.drift_interval = Duration::from_secs(secs);
        }
        if let Some(v) = read_env("DRIFTCTL_DRIFT_STATE_PATH")? {
            config.drift_state_path = v;
        }

        Ok(config)
    }
}

fn read_env(var: &'static str) -> Result<Option<String>, ConfigError> {
    match env::var(var) {
        Ok(v) => Ok(Some(v)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => {
            Err(ConfigError::InvalidValue { var, value: "<non-unicode>".to_string() })
        }
    }
}

fn parse_env<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidValue { var, value: value.to_string() })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
