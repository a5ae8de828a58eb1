// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake log sink for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::LogSink;
use gp_core::{LogEntry, LogLevel};
use std::sync::{Arc, Mutex};

/// Records every entry it is given
#[derive(Clone, Default)]
pub struct FakeLogSink {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl FakeLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded entries
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Messages logged at `level`, in order
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|e| e.level == level)
            .map(|e| e.message)
            .collect()
    }
}

impl LogSink for FakeLogSink {
    fn log(&self, entry: LogEntry) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(entry);
    }
}
