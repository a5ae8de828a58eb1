// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parent process notification
//!
//! Helper processes report back to the supervisor with OS signals only.

#[cfg(any(test, feature = "test-support"))]
mod fake;

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeParentNotifier;

use gp_core::PoolSignal;
use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::{getppid, Pid};
use thiserror::Error;

/// Errors from notification operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    #[error("failed to send {signal} to process {pid}: {source}")]
    Send {
        signal: PoolSignal,
        pid: i32,
        #[source]
        source: Errno,
    },
}

/// OS signal carrying `signal`
pub fn os_signal(signal: PoolSignal) -> Signal {
    match signal {
        PoolSignal::NoWorkers => Signal::SIGUSR1,
        PoolSignal::ValidationFailed => Signal::SIGUSR2,
        PoolSignal::Terminate => Signal::SIGTERM,
    }
}

/// Adapter for telling another process what happened
pub trait ParentNotifier: Send + Sync {
    fn notify(&self, signal: PoolSignal) -> Result<(), NotifyError>;
}

/// Sends the mapped OS signal to a fixed process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalNotifier {
    pid: Pid,
}

impl SignalNotifier {
    pub fn new(pid: i32) -> Self {
        Self {
            pid: Pid::from_raw(pid),
        }
    }

    /// Notifier targeting the process that spawned this one
    pub fn to_parent() -> Self {
        Self { pid: getppid() }
    }

    pub fn pid(&self) -> i32 {
        self.pid.as_raw()
    }
}

impl ParentNotifier for SignalNotifier {
    fn notify(&self, signal: PoolSignal) -> Result<(), NotifyError> {
        tracing::debug!(pid = self.pid.as_raw(), %signal, "notifying parent");
        kill(self.pid, os_signal(signal)).map_err(|source| NotifyError::Send {
            signal,
            pid: self.pid.as_raw(),
            source,
        })
    }
}

#[cfg(test)]
#[path = "signal_tests.rs"]
mod tests;
