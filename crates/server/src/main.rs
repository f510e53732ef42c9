// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `driftctld`: binds the HTTP Facade, runs the Job Queue worker pool, and
//! runs the Drift Detector loop, all sharing one Job Store / Drift State
//! Store / Job Queue.

use anyhow::Context;
use driftctl_core::clock::SystemClock;
use driftctl_core::config::Config;
use driftctl_engine::{apply_secret_overrides, run_worker_pool, DriftDetector, JobOrchestrator, JobQueue};
use driftctl_runner::ProcessRunnerInvoker;
use driftctl_secrets::{HttpSecretBackend, RepoAuthMinter, SecretResolver};
use driftctl_server::state::AppState;
use driftctl_server::{build_router, shutdown::shutdown_signal};
use driftctl_storage::{DriftStateStore, JobStore};
use driftctl_workspace::WorkspaceProvisioner;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let mut config = Config::from_env().context("loading configuration")?;

    let secret_backend = Arc::new(HttpSecretBackend::new(
        env_or("DRIFTCTL_SECRET_STORE_URL", "http://127.0.0.1:8200"),
        env_or("DRIFTCTL_SECRET_ROLE_ID", ""),
        env_or("DRIFTCTL_SECRET_SECRET_ID", ""),
    ));
    let secrets = Arc::new(SecretResolver::new(secret_backend, SystemClock));

    // Secret store > environment > defaults (spec.md §6): `service/config`
    // overrides whatever `Config::from_env` already resolved, when present.
    apply_secret_overrides(&mut config, secrets.as_ref()).await;
    let auth_minter = Arc::new(RepoAuthMinter::new(
        env_or(
            "DRIFTCTL_TOKEN_ENDPOINT_TEMPLATE",
            "https://api.github.example/app/installations/{installation_id}/access_tokens",
        ),
        SystemClock,
    ));
    let workspace = Arc::new(WorkspaceProvisioner::new(env_or("DRIFTCTL_WORKSPACE_ROOT", "/tmp/driftctl-workspaces")));
    let runner = Arc::new(ProcessRunnerInvoker::new(env_or("DRIFTCTL_RUNNER_BINARY", "ansible-playbook")));

    let jobs = Arc::new(JobStore::new());
    let drift_state = Arc::new(DriftStateStore::open(config.drift_state_path).context("opening drift state store")?);

    let orchestrator = Arc::new(JobOrchestrator::new(
        secrets.clone(),
        auth_minter.clone(),
        workspace.clone(),
        runner.clone(),
        jobs.clone(),
        drift_state.clone(),
        SystemClock,
    ));
    let detector = DriftDetector::new(secrets, auth_minter, workspace, runner, drift_state.clone(), SystemClock, config.drift_interval);

    let (queue, receiver) = JobQueue::bounded(config.queue_capacity);
    let state = AppState::new(jobs, queue, drift_state, SystemClock);
    let app = build_router(state, config.rate_limit_per_second);

    let worker_pool = tokio::spawn(run_worker_pool(receiver, config.worker_count, move |id| {
        let orchestrator = orchestrator.clone();
        async move { orchestrator.run_job(id).await }
    }));

    let (shutdown_tx, mut detector_shutdown_rx) = watch::channel(false);
    let detector_task = tokio::spawn(async move {
        tokio::select! {
            () = detector.run_forever() => {}
            _ = detector_shutdown_rx.changed() => {}
        }
    });

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = TcpListener::bind(&addr).await.with_context(|| format!("failed to bind to {addr}"))?;
    info!(addr = %addr, "driftctld listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await
        .context("server error")?;

    info!("waiting for background workers to stop");
    let _ = tokio::time::timeout(Duration::from_secs(30), worker_pool).await;
    let _ = tokio::time::timeout(Duration::from_secs(5), detector_task).await;

    info!("driftctld stopped");
    Ok(())
}
