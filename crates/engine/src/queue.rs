// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job Queue + Worker Pool (C7): a bounded FIFO channel drained by a fixed
//! pool of workers, each running one job to completion before the next.

use driftctl_core::job::JobId;
use tokio::sync::mpsc;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("queue is full")]
pub struct QueueError;

/// Sending half of the bounded channel. Intake holds this; `try_enqueue`
/// never blocks — a full queue is surfaced as `QueueFull` to the HTTP layer
/// (spec.md §5, "Backpressure").
#[derive(Clone)]
pub struct JobQueue {
    sender: mpsc::Sender<JobId>,
}

impl JobQueue {
    /// Builds the channel with `capacity` (spec.md §4.7 default: 100) and
    /// returns both halves; the receiver is handed to the worker pool.
    pub fn bounded(capacity: usize) -> (Self, mpsc::Receiver<JobId>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }

    pub fn try_enqueue(&self, id: JobId) -> Result<(), QueueError> {
        self.sender.try_send(id).map_err(|_| QueueError)
    }
}

/// Spawns `worker_count` tasks that pull job ids off `receiver` and run
/// `handle` to completion, one job at a time, before taking the next.
pub async fn run_worker_pool<F, Fut>(
    receiver: mpsc::Receiver<JobId>,
    worker_count: usize,
    handle: F,
) where
    F: Fn(JobId) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    use std::sync::Arc;
    use tokio::sync::Mutex;

    let receiver = Arc::new(Mutex::new(receiver));
    let handle = Arc::new(handle);
    let mut workers = Vec::with_capacity(worker_count);

    for _ in 0..worker_count {
        let receiver = receiver.clone();
        let handle = handle.clone();
        workers.push(tokio::spawn(async move {
            loop {
                let next = receiver.lock().await.recv().await;
                match next {
                    Some(id) => handle(id).await,
                    None => break,
                }
            }
        }));
    }

    for worker in workers {
        let _ = worker.await;
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
