// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! driftctl-server: the HTTP Facade (C11) — a thin adapter over the Job
//! Store, Job Queue, and Drift State Store.

pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod router;
pub mod shutdown;
pub mod state;

pub use router::build_router;
pub use state::AppState;
