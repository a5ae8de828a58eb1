// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake parent notifier for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{NotifyError, ParentNotifier};
use gp_core::PoolSignal;
use std::sync::{Arc, Mutex};

/// Records every signal instead of sending it
#[derive(Clone, Default)]
pub struct FakeParentNotifier {
    calls: Arc<Mutex<Vec<PoolSignal>>>,
}

impl FakeParentNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded signals
    pub fn calls(&self) -> Vec<PoolSignal> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl ParentNotifier for FakeParentNotifier {
    fn notify(&self, signal: PoolSignal) -> Result<(), NotifyError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(signal);
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
