// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Edge rate limiting (spec.md §4.11): a single token bucket shared by every
//! request, independent of the backpressure the Job Queue applies on top.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use governor::{DefaultDirectRateLimiter, Quota};
use std::num::NonZeroU32;
use std::sync::Arc;

#[derive(Clone)]
pub struct RateLimitLayer {
    limiter: Arc<DefaultDirectRateLimiter>,
}

impl RateLimitLayer {
    /// `per_second` is clamped to at least 1: a misconfigured `0` would
    /// otherwise make every request fail, which is never the intent of a
    /// rate-limit *floor*.
    pub fn new(per_second: u32) -> Self {
        let quota = Quota::per_second(NonZeroU32::new(per_second.max(1)).expect("clamped to >= 1"));
        Self { limiter: Arc::new(DefaultDirectRateLimiter::direct(quota)) }
    }
}

pub async fn rate_limit(
    State(layer): State<RateLimitLayer>,
    req: Request,
    next: Next,
) -> Response {
    if layer.limiter.check().is_err() {
        return crate::error::too_many_requests();
    }
    next.run(req).await
}

#[cfg(test)]
#[path = "rate_limit_tests.rs"]
mod tests;
