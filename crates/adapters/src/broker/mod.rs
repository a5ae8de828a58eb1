// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Broker worker seam
//!
//! The wire protocol lives behind [`BrokerWorker`]; the poll loop only sees
//! return codes and job invocations.

#[cfg(any(test, feature = "test-support"))]
mod fake;

#[cfg(any(test, feature = "test-support"))]
pub use fake::{BrokerCall, FakeBroker, FakeConnector, WorkStep};

use gp_core::{Endpoint, JobInvocation, JobOutput};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Outcome of a `work` or `wait` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnCode {
    /// A job was processed (`work`) or activity is pending (`wait`)
    Success,
    /// Non-blocking I/O would block; wait before polling again
    IoWait,
    /// No job was available
    NoJobs,
    /// Every server connection is down
    NoActiveConnections,
    Timeout,
    Failure(String),
}

impl fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnCode::Success => f.write_str("success"),
            ReturnCode::IoWait => f.write_str("io_wait"),
            ReturnCode::NoJobs => f.write_str("no_jobs"),
            ReturnCode::NoActiveConnections => f.write_str("no_active_connections"),
            ReturnCode::Timeout => f.write_str("timeout"),
            ReturnCode::Failure(msg) => write!(f, "failure: {}", msg),
        }
    }
}

/// Errors from broker operations outside the poll cycle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrokerError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("registration failed for {function}: {reason}")]
    RegistrationFailed { function: String, reason: String },
    #[error("broker error: {0}")]
    Other(String),
}

/// Runs one job; `None` means no handler ran and the job produced nothing
pub type Dispatch<'a> = dyn FnMut(JobInvocation) -> Option<JobOutput> + 'a;

/// One worker connection to the job broker
pub trait BrokerWorker {
    fn add_server(&mut self, endpoint: &Endpoint) -> Result<(), BrokerError>;

    /// Register `name` so the broker may hand this worker its jobs
    fn add_function(&mut self, name: &str, timeout: Option<Duration>) -> Result<(), BrokerError>;

    /// Process at most one job, passing it to `dispatch`. Non-blocking.
    fn work(&mut self, dispatch: &mut Dispatch<'_>) -> ReturnCode;

    /// Block until there is activity or the broker's I/O timeout elapses
    fn wait(&mut self) -> ReturnCode;

    fn unregister_all(&mut self) -> Result<(), BrokerError>;
}

impl<B: BrokerWorker + ?Sized> BrokerWorker for Box<B> {
    fn add_server(&mut self, endpoint: &Endpoint) -> Result<(), BrokerError> {
        (**self).add_server(endpoint)
    }

    fn add_function(&mut self, name: &str, timeout: Option<Duration>) -> Result<(), BrokerError> {
        (**self).add_function(name, timeout)
    }

    fn work(&mut self, dispatch: &mut Dispatch<'_>) -> ReturnCode {
        (**self).work(dispatch)
    }

    fn wait(&mut self) -> ReturnCode {
        (**self).wait()
    }

    fn unregister_all(&mut self) -> Result<(), BrokerError> {
        (**self).unregister_all()
    }
}

/// Opens a fresh broker worker in each worker process
pub trait BrokerConnector: Send + Sync {
    fn connect(&self) -> Result<Box<dyn BrokerWorker>, BrokerError>;
}

impl<F> BrokerConnector for F
where
    F: Fn() -> Result<Box<dyn BrokerWorker>, BrokerError> + Send + Sync,
{
    fn connect(&self) -> Result<Box<dyn BrokerWorker>, BrokerError> {
        self()
    }
}
