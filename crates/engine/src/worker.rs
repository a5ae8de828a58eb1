// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker poll loop
//!
//! One loop per worker process: register, then alternate between `work` and
//! `wait` until a run limit is hit or a stop is requested. A job that has
//! started always runs to completion before the loop checks for a stop.
//!
//! An unreachable broker is an outage, not an error: connecting and
//! registering retry every [`OUTAGE_BACKOFF`] until they succeed or a stop
//! is requested.

use crate::error::WorkerError;
use crate::executor::JobExecutor;
use gp_adapters::{BrokerConnector, BrokerError, BrokerWorker, LogSink, ReturnCode};
use gp_core::{Clock, Endpoint, RunLimits, StopFlag, WorkerId};
use std::fmt;
use std::time::{Duration, Instant};

/// Pause after a wait that found every broker connection down
pub const OUTAGE_BACKOFF: Duration = Duration::from_secs(5);

/// Open a broker connection, retrying through outages.
///
/// Returns `None` if `stop` is requested while the broker is unreachable.
pub fn connect_with_retry<C: Clock>(
    connector: &dyn BrokerConnector,
    clock: &C,
    stop: &StopFlag,
) -> Option<Box<dyn BrokerWorker>> {
    loop {
        match connector.connect() {
            Ok(broker) => return Some(broker),
            Err(e) if stop.is_requested() => {
                tracing::warn!(error = %e, "broker unreachable, giving up on stop request");
                return None;
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    backoff_secs = OUTAGE_BACKOFF.as_secs(),
                    "broker unreachable, retrying"
                );
                clock.sleep(OUTAGE_BACKOFF);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerPhase {
    Registering,
    Polling,
    Stopping,
    Terminated,
}

/// Why the poll loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    RunTimeExceeded,
    MaxRunsReached,
    Requested,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StopReason::RunTimeExceeded => "run time exceeded",
            StopReason::MaxRunsReached => "max runs reached",
            StopReason::Requested => "stop requested",
        })
    }
}

/// Mutable state of one worker process
#[derive(Debug, Clone)]
pub struct WorkerRuntimeState {
    pub started_at: Instant,
    pub jobs_executed: u64,
    pub stop_requested: bool,
    pub phase: WorkerPhase,
}

impl WorkerRuntimeState {
    pub fn new(started_at: Instant) -> Self {
        Self {
            started_at,
            jobs_executed: 0,
            stop_requested: false,
            phase: WorkerPhase::Registering,
        }
    }
}

/// Summary returned once the loop has unregistered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerReport {
    pub id: WorkerId,
    pub jobs_executed: u64,
    pub reason: StopReason,
}

/// Drives one broker connection for one worker process
pub struct WorkerLoop<B, L, C> {
    id: WorkerId,
    broker: B,
    executor: JobExecutor<L>,
    clock: C,
    endpoints: Vec<Endpoint>,
    functions: Vec<String>,
    limits: RunLimits,
    stop: StopFlag,
    state: WorkerRuntimeState,
}

impl<B, L, C> WorkerLoop<B, L, C>
where
    B: BrokerWorker,
    L: LogSink,
    C: Clock,
{
    pub fn new(id: WorkerId, broker: B, executor: JobExecutor<L>, clock: C) -> Self {
        let state = WorkerRuntimeState::new(clock.now());
        Self {
            id,
            broker,
            executor,
            clock,
            endpoints: vec![Endpoint::default()],
            functions: Vec::new(),
            limits: RunLimits::unlimited(),
            stop: StopFlag::new(),
            state,
        }
    }

    pub fn with_endpoints(mut self, endpoints: Vec<Endpoint>) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Functions this worker registers; empty means every planned function
    pub fn with_functions(mut self, functions: Vec<String>) -> Self {
        self.functions = functions;
        self
    }

    pub fn with_limits(mut self, limits: RunLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_stop_flag(mut self, stop: StopFlag) -> Self {
        self.stop = stop;
        self
    }

    pub fn state(&self) -> &WorkerRuntimeState {
        &self.state
    }

    /// Register, poll until stopped, then unregister
    pub fn run(mut self) -> Result<WorkerReport, WorkerError> {
        let span = tracing::info_span!("worker", id = %self.id.short());
        let _guard = span.enter();

        let reason = if self.register()? {
            self.state.phase = WorkerPhase::Polling;
            tracing::info!(functions = ?self.functions, "polling");
            self.poll()
        } else {
            self.state.stop_requested = true;
            StopReason::Requested
        };

        self.state.phase = WorkerPhase::Stopping;
        tracing::info!(%reason, jobs = self.state.jobs_executed, "stopping");
        if let Err(e) = self.broker.unregister_all() {
            tracing::warn!(error = %e, "unregister failed");
        }
        self.state.phase = WorkerPhase::Terminated;

        Ok(WorkerReport {
            id: self.id,
            jobs_executed: self.state.jobs_executed,
            reason,
        })
    }

    /// Returns `false` if a stop was requested before registration finished
    fn register(&mut self) -> Result<bool, WorkerError> {
        let specs = self.assigned_specs()?;

        for endpoint in self.endpoints.clone() {
            if !self.retry(|broker| broker.add_server(&endpoint)) {
                return Ok(false);
            }
        }
        for (name, timeout) in &specs {
            if !self.retry(|broker| broker.add_function(name, *timeout)) {
                return Ok(false);
            }
        }
        self.functions = specs.into_iter().map(|(name, _)| name).collect();
        Ok(true)
    }

    /// Name and timeout of every function to register, highest priority first
    fn assigned_specs(&self) -> Result<Vec<(String, Option<Duration>)>, WorkerError> {
        let plan = self.executor.resolver().plan();
        let mut specs = if self.functions.is_empty() {
            plan.iter().collect::<Vec<_>>()
        } else {
            self.functions
                .iter()
                .map(|name| {
                    plan.get(name)
                        .ok_or_else(|| WorkerError::UnknownFunction(name.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?
        };
        if specs.is_empty() {
            return Err(WorkerError::NoFunctions);
        }

        // The broker treats order as a hint
        specs.sort_by(|a, b| b.priority.cmp(&a.priority));
        Ok(specs
            .into_iter()
            .map(|spec| (spec.name.clone(), spec.timeout))
            .collect())
    }

    /// Repeat a broker call until it succeeds, backing off between attempts.
    /// Returns `false` if a stop is requested while the call keeps failing.
    fn retry(&mut self, mut op: impl FnMut(&mut B) -> Result<(), BrokerError>) -> bool {
        loop {
            match op(&mut self.broker) {
                Ok(()) => return true,
                Err(e) if self.stop.is_requested() => {
                    tracing::warn!(error = %e, "broker unavailable, giving up on stop request");
                    return false;
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        backoff_secs = OUTAGE_BACKOFF.as_secs(),
                        "broker unavailable, retrying"
                    );
                    self.clock.sleep(OUTAGE_BACKOFF);
                }
            }
        }
    }

    fn poll(&mut self) -> StopReason {
        loop {
            if let Some(reason) = self.stop_reason() {
                self.state.stop_requested = true;
                return reason;
            }

            let executor = &self.executor;
            let state = &mut self.state;
            let code = self.broker.work(&mut |job| {
                let execution = executor.execute(&job);
                if execution.invoked {
                    state.jobs_executed += 1;
                }
                execution.output
            });

            match code {
                ReturnCode::Success => {}
                ReturnCode::NoJobs | ReturnCode::IoWait | ReturnCode::NoActiveConnections => {
                    self.idle()
                }
                other => tracing::warn!(code = %other, "unexpected work result"),
            }
        }
    }

    fn idle(&mut self) {
        if self.broker.wait() == ReturnCode::NoActiveConnections {
            tracing::debug!(
                backoff_secs = OUTAGE_BACKOFF.as_secs(),
                "no broker connections, backing off"
            );
            self.clock.sleep(OUTAGE_BACKOFF);
        }
    }

    fn stop_reason(&self) -> Option<StopReason> {
        if self.stop.is_requested() {
            Some(StopReason::Requested)
        } else if self.limits.exhausted(self.state.jobs_executed) {
            Some(StopReason::MaxRunsReached)
        } else if self.limits.expired(self.state.started_at, self.clock.now()) {
            Some(StopReason::RunTimeExceeded)
        } else {
            None
        }
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
