// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pool supervisor: the startup gate and worker respawning
//!
//! Workers are only started after a helper process has instantiated every
//! planned handler. The helper reports failure with SIGUSR2 and an empty
//! plan with SIGUSR1; both handlers are installed before the helper starts
//! so neither signal can take down the supervisor.
//!
//! A worker that exits soon after starting is respawned with exponential
//! backoff, so a pool that cannot reach its broker does not fork in a loop.

use crate::launcher::{ChildRole, Launcher};
use gp_adapters::os_signal;
use gp_core::PoolSignal;
use nix::sys::signal::kill;
use nix::unistd::Pid;
use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::process::ExitStatus;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::process::Child;
use tokio::signal::unix::{signal, Signal, SignalKind};
use tokio::task::{JoinError, JoinSet};

/// How long to wait for a signal that may trail a failed helper's exit
const SIGNAL_GRACE: Duration = Duration::from_millis(100);

/// How long a helper gets to exit after it has signalled
const REAP_TIMEOUT: Duration = Duration::from_secs(1);

/// A worker that exits sooner than this after starting is failing
const MIN_UPTIME: Duration = Duration::from_secs(10);

/// Why the pool could not start
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("no workers configured")]
    NoWorkers,
    #[error("handler validation failed")]
    ValidationFailed,
    #[error("validator exited with {0}")]
    HelperExited(ExitStatus),
    #[error("validator did not finish within {0:?}")]
    Timeout(Duration),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Totals reported when the supervisor shuts down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SupervisorReport {
    pub spawned: usize,
    pub respawned: usize,
}

/// Keeps one live process per pool layout assignment
pub struct Supervisor<L> {
    launcher: L,
    workers: usize,
    validation_timeout: Duration,
    respawn_backoff: Duration,
    max_respawn_backoff: Duration,
}

impl<L: Launcher> Supervisor<L> {
    pub fn new(launcher: L, workers: usize) -> Self {
        Self {
            launcher,
            workers,
            validation_timeout: Duration::from_secs(30),
            respawn_backoff: Duration::from_secs(1),
            max_respawn_backoff: Duration::from_secs(60),
        }
    }

    pub fn with_validation_timeout(mut self, timeout: Duration) -> Self {
        self.validation_timeout = timeout;
        self
    }

    /// Backoff for workers that keep exiting soon after they start
    pub fn with_respawn_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.respawn_backoff = initial;
        self.max_respawn_backoff = max;
        self
    }

    /// Validate handlers, then supervise workers until `shutdown` resolves
    pub async fn start<F>(&self, shutdown: F) -> Result<SupervisorReport, StartupError>
    where
        F: Future<Output = ()>,
    {
        self.validate().await?;
        self.run(shutdown).await
    }

    /// Run the startup validator in a helper process and wait for its verdict
    pub async fn validate(&self) -> Result<(), StartupError> {
        let mut no_workers = signal(SignalKind::user_defined1())?;
        let mut failed = signal(SignalKind::user_defined2())?;

        let mut helper = self.launcher.launch(ChildRole::Validate)?;
        let timeout = tokio::time::sleep(self.validation_timeout);
        tokio::pin!(timeout);

        let gate = tokio::select! {
            _ = no_workers.recv() => Gate::Signalled(StartupError::NoWorkers),
            _ = failed.recv() => Gate::Signalled(StartupError::ValidationFailed),
            status = helper.wait() => Gate::Exited(status?),
            _ = &mut timeout => Gate::TimedOut,
        };

        let verdict = match gate {
            Gate::Exited(status) if status.success() => {
                tracing::info!("handlers validated");
                return Ok(());
            }
            Gate::Exited(status) => {
                Err(trailing_signal(&mut no_workers, &mut failed, status).await)
            }
            Gate::Signalled(e) => Err(e),
            Gate::TimedOut => Err(StartupError::Timeout(self.validation_timeout)),
        };

        reap(helper).await;
        if let Err(e) = &verdict {
            tracing::error!(error = %e, "startup validation failed");
        }
        verdict
    }

    /// Start every worker and restart any that exit, until `shutdown`
    /// resolves. Then terminate the workers and wait for them.
    ///
    /// If a worker cannot be launched, the workers already running are
    /// terminated before the error is returned.
    pub async fn run<F>(&self, shutdown: F) -> Result<SupervisorReport, StartupError>
    where
        F: Future<Output = ()>,
    {
        let mut report = SupervisorReport::default();
        let mut workers = Workers::new();

        let result = self.supervise(shutdown, &mut workers, &mut report).await;
        workers.stop().await;

        tracing::info!(spawned = report.spawned, respawned = report.respawned, "pool stopped");
        result.map(|()| report)
    }

    async fn supervise<F>(
        &self,
        shutdown: F,
        workers: &mut Workers,
        report: &mut SupervisorReport,
    ) -> Result<(), StartupError>
    where
        F: Future<Output = ()>,
    {
        for assignment in 0..self.workers {
            self.spawn_worker(assignment, workers)?;
            report.spawned += 1;
        }
        tracing::info!(workers = self.workers, "pool started");

        tokio::pin!(shutdown);
        loop {
            let event = tokio::select! {
                _ = &mut shutdown => return Ok(()),
                Some(joined) = workers.running.join_next() => Event::Exited(joined),
                Some(due) = workers.delayed.join_next() => Event::Due(due),
            };

            let assignment = match event {
                Event::Exited(Ok((assignment, status))) => {
                    match status {
                        Ok(status) => {
                            tracing::info!(kind = "proc", assignment, %status, "worker exited")
                        }
                        Err(e) => {
                            tracing::warn!(assignment, error = %e, "failed to wait for worker")
                        }
                    }
                    let delay = self.respawn_delay(workers.exited(assignment));
                    if !delay.is_zero() {
                        tracing::warn!(
                            assignment,
                            delay_ms = delay.as_millis() as u64,
                            "worker exited soon after starting, delaying respawn"
                        );
                        workers.delayed.spawn(async move {
                            tokio::time::sleep(delay).await;
                            assignment
                        });
                        continue;
                    }
                    assignment
                }
                Event::Due(Ok(assignment)) => assignment,
                Event::Exited(Err(e)) | Event::Due(Err(e)) => {
                    tracing::error!(error = %e, "worker wait task failed");
                    continue;
                }
            };

            self.spawn_worker(assignment, workers)?;
            report.respawned += 1;
        }
    }

    /// Delay before respawning a worker that failed `quick_exits` times in a
    /// row, doubling from the initial backoff up to the maximum
    fn respawn_delay(&self, quick_exits: u32) -> Duration {
        if quick_exits == 0 {
            return Duration::ZERO;
        }
        let factor = 2u32.saturating_pow(quick_exits - 1);
        self.respawn_backoff
            .saturating_mul(factor)
            .min(self.max_respawn_backoff)
    }

    fn spawn_worker(&self, assignment: usize, workers: &mut Workers) -> Result<(), StartupError> {
        let mut child = self.launcher.launch(ChildRole::Worker { assignment })?;
        if let Some(pid) = child.id() {
            workers.pids.insert(assignment, pid as i32);
        }
        workers.started.insert(assignment, Instant::now());
        workers
            .running
            .spawn(async move { (assignment, child.wait().await) });
        Ok(())
    }
}

/// Worker processes owned by a running supervisor
struct Workers {
    running: JoinSet<(usize, io::Result<ExitStatus>)>,
    /// Respawns waiting out their backoff
    delayed: JoinSet<usize>,
    pids: HashMap<usize, i32>,
    started: HashMap<usize, Instant>,
    /// Consecutive early exits per assignment
    quick_exits: HashMap<usize, u32>,
}

impl Workers {
    fn new() -> Self {
        Self {
            running: JoinSet::new(),
            delayed: JoinSet::new(),
            pids: HashMap::new(),
            started: HashMap::new(),
            quick_exits: HashMap::new(),
        }
    }

    /// Forget an exited worker. Returns how many times in a row its
    /// assignment has exited before `MIN_UPTIME`.
    fn exited(&mut self, assignment: usize) -> u32 {
        self.pids.remove(&assignment);
        let quick = self
            .started
            .remove(&assignment)
            .is_some_and(|at| at.elapsed() < MIN_UPTIME);
        let streak = self.quick_exits.entry(assignment).or_default();
        *streak = if quick { streak.saturating_add(1) } else { 0 };
        *streak
    }

    /// Cancel pending respawns, terminate every live worker and reap it
    async fn stop(&mut self) {
        self.delayed.abort_all();
        tracing::info!(workers = self.pids.len(), "stopping workers");
        for (assignment, pid) in &self.pids {
            if let Err(e) = kill(Pid::from_raw(*pid), os_signal(PoolSignal::Terminate)) {
                tracing::warn!(assignment, pid, error = %e, "failed to signal worker");
            }
        }
        while self.running.join_next().await.is_some() {}
    }
}

/// Next thing the supervise loop reacts to
enum Event {
    Exited(Result<(usize, io::Result<ExitStatus>), JoinError>),
    Due(Result<usize, JoinError>),
}

/// First event seen by the startup gate
enum Gate {
    Signalled(StartupError),
    Exited(ExitStatus),
    TimedOut,
}

/// Classify a failed helper exit by any signal that arrives shortly after
async fn trailing_signal(
    no_workers: &mut Signal,
    failed: &mut Signal,
    status: ExitStatus,
) -> StartupError {
    tokio::select! {
        _ = no_workers.recv() => StartupError::NoWorkers,
        _ = failed.recv() => StartupError::ValidationFailed,
        _ = tokio::time::sleep(SIGNAL_GRACE) => StartupError::HelperExited(status),
    }
}

/// Wait briefly for a helper to exit, killing it if it does not
async fn reap(mut child: Child) {
    if tokio::time::timeout(REAP_TIMEOUT, child.wait()).await.is_err() {
        if let Err(e) = child.kill().await {
            tracing::warn!(error = %e, "failed to kill validator");
        }
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
