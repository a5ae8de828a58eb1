// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for worker processes

use gp_core::ResolveError;
use thiserror::Error;

/// Errors that end a worker process early
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("function {0} is not in the plan")]
    UnknownFunction(String),
    #[error("worker has no functions assigned")]
    NoFunctions,
}

/// Why the startup validator rejected the configuration
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("no workers configured")]
    NoWorkers,
    #[error("validation failed: {0}")]
    Resolve(#[from] ResolveError),
}
