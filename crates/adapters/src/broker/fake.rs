// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake broker for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{BrokerConnector, BrokerError, BrokerWorker, Dispatch, ReturnCode};
use gp_core::{Endpoint, JobInvocation, JobOutput, StopFlag};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Recorded broker call
#[derive(Debug, Clone, PartialEq)]
pub enum BrokerCall {
    AddServer(Endpoint),
    AddFunction {
        name: String,
        timeout: Option<Duration>,
    },
    Work,
    Wait,
    UnregisterAll,
}

/// What the next `work` call does
#[derive(Debug, Clone)]
pub enum WorkStep {
    /// Hand this job to the dispatcher and report success
    Job(JobInvocation),
    /// Return this code without running anything
    Code(ReturnCode),
}

#[derive(Default)]
struct FakeBrokerState {
    work_script: VecDeque<WorkStep>,
    wait_script: VecDeque<ReturnCode>,
    calls: Vec<BrokerCall>,
    results: Vec<(String, Option<JobOutput>)>,
    /// Function name and how many more registrations of it fail
    fail_registration: Option<(String, usize)>,
    fail_servers: usize,
    stop_when_exhausted: Option<StopFlag>,
}

/// Scripted in-memory broker.
///
/// `work` plays back the work script, then reports `NoJobs`. `wait` plays
/// back the wait script, then reports `Success`.
#[derive(Clone, Default)]
pub struct FakeBroker {
    state: Arc<Mutex<FakeBrokerState>>,
}

impl FakeBroker {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut FakeBrokerState) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut state)
    }

    /// Queue a job for a later `work` call
    pub fn push_job(&self, job: JobInvocation) {
        self.with_state(|s| s.work_script.push_back(WorkStep::Job(job)));
    }

    /// Queue a bare return code for a later `work` call
    pub fn push_work_code(&self, code: ReturnCode) {
        self.with_state(|s| s.work_script.push_back(WorkStep::Code(code)));
    }

    /// Queue a return code for a later `wait` call
    pub fn push_wait_code(&self, code: ReturnCode) {
        self.with_state(|s| s.wait_script.push_back(code));
    }

    /// Make the next `times` registrations of `name` fail
    pub fn fail_registration(&self, name: &str, times: usize) {
        self.with_state(|s| s.fail_registration = Some((name.to_string(), times)));
    }

    /// Make the next `times` `add_server` calls fail
    pub fn fail_servers(&self, times: usize) {
        self.with_state(|s| s.fail_servers = times);
    }

    /// Request `flag` once `work` is called with an empty script
    pub fn stop_when_exhausted(&self, flag: StopFlag) {
        self.with_state(|s| s.stop_when_exhausted = Some(flag));
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<BrokerCall> {
        self.with_state(|s| s.calls.clone())
    }

    /// Functions registered so far, in order
    pub fn registered(&self) -> Vec<String> {
        self.with_state(|s| {
            s.calls
                .iter()
                .filter_map(|call| match call {
                    BrokerCall::AddFunction { name, .. } => Some(name.clone()),
                    _ => None,
                })
                .collect()
        })
    }

    /// `(handle, output)` for every job handed to the dispatcher
    pub fn results(&self) -> Vec<(String, Option<JobOutput>)> {
        self.with_state(|s| s.results.clone())
    }

    pub fn count(&self, call: &BrokerCall) -> usize {
        self.with_state(|s| s.calls.iter().filter(|c| *c == call).count())
    }
}

impl BrokerWorker for FakeBroker {
    fn add_server(&mut self, endpoint: &Endpoint) -> Result<(), BrokerError> {
        self.with_state(|s| {
            s.calls.push(BrokerCall::AddServer(endpoint.clone()));
            if s.fail_servers > 0 {
                s.fail_servers -= 1;
                return Err(BrokerError::ConnectionFailed(endpoint.to_string()));
            }
            Ok(())
        })
    }

    fn add_function(&mut self, name: &str, timeout: Option<Duration>) -> Result<(), BrokerError> {
        self.with_state(|s| {
            s.calls.push(BrokerCall::AddFunction {
                name: name.to_string(),
                timeout,
            });
            match &mut s.fail_registration {
                Some((failing, left)) if failing.as_str() == name && *left > 0 => {
                    *left -= 1;
                    Err(BrokerError::RegistrationFailed {
                        function: name.to_string(),
                        reason: "rejected by fake broker".to_string(),
                    })
                }
                _ => Ok(()),
            }
        })
    }

    fn work(&mut self, dispatch: &mut Dispatch<'_>) -> ReturnCode {
        let step = self.with_state(|s| {
            s.calls.push(BrokerCall::Work);
            let step = s.work_script.pop_front();
            if step.is_none() {
                if let Some(flag) = &s.stop_when_exhausted {
                    flag.request();
                }
            }
            step
        });

        match step {
            Some(WorkStep::Job(job)) => {
                let handle = job.handle.clone();
                // Lock released: the dispatcher may call back into the fake
                let output = dispatch(job);
                self.with_state(|s| s.results.push((handle, output)));
                ReturnCode::Success
            }
            Some(WorkStep::Code(code)) => code,
            None => ReturnCode::NoJobs,
        }
    }

    fn wait(&mut self) -> ReturnCode {
        self.with_state(|s| {
            s.calls.push(BrokerCall::Wait);
            s.wait_script.pop_front().unwrap_or(ReturnCode::Success)
        })
    }

    fn unregister_all(&mut self) -> Result<(), BrokerError> {
        self.with_state(|s| s.calls.push(BrokerCall::UnregisterAll));
        Ok(())
    }
}

/// Connector that hands out clones of one [`FakeBroker`]
#[derive(Clone, Default)]
pub struct FakeConnector {
    broker: FakeBroker,
    refuse: Option<String>,
    /// Refusals left before connections succeed
    refusals: Arc<Mutex<usize>>,
    attempts: Arc<Mutex<usize>>,
}

impl FakeConnector {
    pub fn new(broker: FakeBroker) -> Self {
        Self {
            broker,
            ..Self::default()
        }
    }

    /// Fail every `connect` with `reason`
    pub fn refusing(reason: &str) -> Self {
        Self::refusing_times(reason, usize::MAX)
    }

    /// Fail the first `times` connects with `reason`, then succeed
    pub fn refusing_times(reason: &str, times: usize) -> Self {
        Self {
            refuse: Some(reason.to_string()),
            refusals: Arc::new(Mutex::new(times)),
            ..Self::default()
        }
    }

    pub fn broker(&self) -> &FakeBroker {
        &self.broker
    }

    /// Number of `connect` calls so far
    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl BrokerConnector for FakeConnector {
    fn connect(&self) -> Result<Box<dyn BrokerWorker>, BrokerError> {
        *self.attempts.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        let mut refusals = self.refusals.lock().unwrap_or_else(|e| e.into_inner());
        match &self.refuse {
            Some(reason) if *refusals > 0 => {
                *refusals -= 1;
                Err(BrokerError::ConnectionFailed(reason.clone()))
            }
            _ => Ok(Box::new(self.broker.clone())),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
