// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log sink for job log entries

#[cfg(any(test, feature = "test-support"))]
mod fake;

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeLogSink;

use gp_core::{LogEntry, LogLevel};

/// Destination for job log entries. Only level and content are decided by
/// the caller; formatting and transport belong to the sink.
pub trait LogSink: Send + Sync {
    fn log(&self, entry: LogEntry);
}

impl<S: LogSink + ?Sized> LogSink for std::sync::Arc<S> {
    fn log(&self, entry: LogEntry) {
        (**self).log(entry)
    }
}

/// Forwards entries to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log(&self, entry: LogEntry) {
        let LogEntry {
            level,
            handle,
            message,
        } = entry;
        match level {
            LogLevel::Error => tracing::error!(%handle, "{}", message),
            LogLevel::Info => tracing::info!(%handle, "{}", message),
            LogLevel::ProcInfo => tracing::info!(kind = "proc", %handle, "{}", message),
            LogLevel::WorkerInfo => tracing::debug!(%handle, "{}", message),
            LogLevel::Debug => tracing::trace!(%handle, "{}", message),
        }
    }
}

#[cfg(test)]
#[path = "tracing_tests.rs"]
mod tests;
