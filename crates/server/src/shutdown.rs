// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Graceful shutdown signal (spec.md §6): `SIGTERM`/`SIGINT` stop accepting
//! new work while in-flight workers finish their current job.

use tokio::sync::watch;
use tracing::info;

/// Resolves on the first `ctrl_c` or `SIGTERM`, for `axum::serve`'s
/// `with_graceful_shutdown`. Also flips `shutdown_tx` so the worker pool and
/// Drift Detector can observe the same signal and stop picking up new work.
pub async fn shutdown_signal(shutdown_tx: watch::Sender<bool>) {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, stopping server");
    let _ = shutdown_tx.send(true);
}
