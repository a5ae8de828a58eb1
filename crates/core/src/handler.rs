// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job handler contract

use serde_json::Value;
use std::borrow::Cow;

/// A single job handed to a worker by the broker. Discarded after execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobInvocation {
    /// Function name exactly as the broker sent it
    pub function_name: String,
    /// Broker-assigned opaque job handle
    pub handle: String,
    pub payload: Vec<u8>,
}

impl JobInvocation {
    pub fn new(
        function_name: impl Into<String>,
        handle: impl Into<String>,
        payload: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            function_name: function_name.into(),
            handle: handle.into(),
            payload: payload.into(),
        }
    }

    /// Payload as text, lossily decoded
    pub fn workload(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }
}

/// What a handler hands back: its result plus any log entries it produced.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HandlerOutput {
    pub result: Value,
    pub log: Vec<Value>,
}

impl HandlerOutput {
    pub fn new(result: impl Into<Value>) -> Self {
        Self {
            result: result.into(),
            log: Vec::new(),
        }
    }

    /// Append one auxiliary log entry
    pub fn log(mut self, entry: impl Into<Value>) -> Self {
        self.log.push(entry.into());
        self
    }
}

/// Business logic for one job function.
///
/// A fresh instance is built for every job, so implementations may keep
/// per-job state in `self` without leaking it into the next job.
pub trait JobHandler: Send {
    fn run(&mut self, job: &JobInvocation) -> HandlerOutput;
}

impl<F> JobHandler for F
where
    F: FnMut(&JobInvocation) -> HandlerOutput + Send,
{
    fn run(&mut self, job: &JobInvocation) -> HandlerOutput {
        self(job)
    }
}
