// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Worker-side execution: job execution, the poll loop and startup validation

mod error;
mod executor;
mod validator;
mod worker;

pub use error::{ValidationError, WorkerError};
pub use executor::{Execution, JobExecutor};
pub use validator::StartupValidator;
pub use worker::{
    connect_with_retry, StopReason, WorkerLoop, WorkerPhase, WorkerReport, WorkerRuntimeState,
    OUTAGE_BACKOFF,
};
