// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[test]
fn try_enqueue_succeeds_while_capacity_remains() {
    let (queue, _receiver) = JobQueue::bounded(2);
    assert!(queue.try_enqueue(JobId::next()).is_ok());
    assert!(queue.try_enqueue(JobId::next()).is_ok());
}

#[test]
fn try_enqueue_fails_once_the_bound_is_reached() {
    let (queue, _receiver) = JobQueue::bounded(1);
    assert!(queue.try_enqueue(JobId::next()).is_ok());
    assert_eq!(queue.try_enqueue(JobId::next()), Err(QueueError));
}

#[tokio::test]
async fn worker_pool_drains_every_enqueued_job() {
    let (queue, receiver) = JobQueue::bounded(10);
    let processed = Arc::new(AtomicUsize::new(0));

    for _ in 0..5 {
        queue.try_enqueue(JobId::next()).unwrap();
    }
    drop(queue);

    let counter = processed.clone();
    run_worker_pool(receiver, 2, move |_id| {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    })
    .await;

    assert_eq!(processed.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn workers_process_jobs_one_at_a_time_each() {
    let (queue, receiver) = JobQueue::bounded(10);
    let concurrent = Arc::new(AtomicUsize::new(0));
    let max_concurrent = Arc::new(AtomicUsize::new(0));

    for _ in 0..4 {
        queue.try_enqueue(JobId::next()).unwrap();
    }
    drop(queue);

    let concurrent_handle = concurrent.clone();
    let max_handle = max_concurrent.clone();
    run_worker_pool(receiver, 1, move |_id| {
        let concurrent = concurrent_handle.clone();
        let max_concurrent = max_handle.clone();
        async move {
            let now = concurrent.fetch_add(1, Ordering::SeqCst) + 1;
            max_concurrent.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            concurrent.fetch_sub(1, Ordering::SeqCst);
        }
    })
    .await;

    assert_eq!(max_concurrent.load(Ordering::SeqCst), 1);
}
