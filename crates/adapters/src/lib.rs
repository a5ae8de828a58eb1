// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: the broker, the log sink and the parent process

pub mod broker;
pub mod log_sink;
pub mod notify;
pub mod traced;

#[cfg(test)]
mod test_support;

pub use broker::{BrokerConnector, BrokerError, BrokerWorker, Dispatch, ReturnCode};
pub use log_sink::{LogSink, TracingLogSink};
pub use notify::{os_signal, NotifyError, ParentNotifier, SignalNotifier};
pub use traced::TracedBroker;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use broker::{BrokerCall, FakeBroker, FakeConnector, WorkStep};
#[cfg(any(test, feature = "test-support"))]
pub use log_sink::FakeLogSink;
#[cfg(any(test, feature = "test-support"))]
pub use notify::FakeParentNotifier;
