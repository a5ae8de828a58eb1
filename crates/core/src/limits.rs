// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-worker run limits
//!
//! A worker stops polling once it has been alive for `max_run_time` or has
//! executed `max_runs` jobs, whichever comes first. Both are optional.

use std::time::{Duration, Instant};

/// Bounds on a single worker process's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunLimits {
    pub max_run_time: Option<Duration>,
    pub max_runs: Option<u64>,
}

impl RunLimits {
    /// No limits: the worker runs until told to stop
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_max_run_time(mut self, max_run_time: Duration) -> Self {
        self.max_run_time = Some(max_run_time).filter(|d| !d.is_zero());
        self
    }

    pub fn with_max_runs(mut self, max_runs: u64) -> Self {
        self.max_runs = Some(max_runs).filter(|n| *n > 0);
        self
    }

    /// Whether a worker started at `started_at` has run longer than its run
    /// time. Reaching the limit exactly is not yet expired.
    pub fn expired(&self, started_at: Instant, now: Instant) -> bool {
        self.max_run_time
            .is_some_and(|limit| now.saturating_duration_since(started_at) > limit)
    }

    /// Whether `jobs_executed` has reached the per-worker job cap
    pub fn exhausted(&self, jobs_executed: u64) -> bool {
        self.max_runs.is_some_and(|limit| jobs_executed >= limit)
    }
}

#[cfg(test)]
#[path = "limits_tests.rs"]
mod tests;
