// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notifications exchanged between the supervisor and its helper processes

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// What a helper process tells its parent, or the parent tells a child
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolSignal {
    /// The configuration plans no functions
    NoWorkers,
    /// A planned function could not be resolved to a handler
    ValidationFailed,
    /// Finish the current job and exit
    Terminate,
}

impl fmt::Display for PoolSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PoolSignal::NoWorkers => "no_workers",
            PoolSignal::ValidationFailed => "validation_failed",
            PoolSignal::Terminate => "terminate",
        })
    }
}

/// Shared "stop after the current job" request.
///
/// Set from a signal handler, read by the poll loop between iterations.
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "signal_tests.rs"]
mod tests;
