// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pool layout: which worker processes register which functions

use crate::function::FunctionPlan;
use serde::Serialize;
use std::fmt;

/// Whether a worker process serves many functions or exactly one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentKind {
    Shared,
    Dedicated,
}

impl fmt::Display for AssignmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AssignmentKind::Shared => "shared",
            AssignmentKind::Dedicated => "dedicated",
        })
    }
}

/// The functions one worker process registers with the broker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerAssignment {
    pub kind: AssignmentKind,
    /// Registration order: highest priority first
    pub functions: Vec<String>,
}

/// One assignment per worker process the supervisor keeps alive.
///
/// Every function ends up registered by exactly `worker_count` processes:
/// shared workers cover each non-dedicated function once, dedicated workers
/// make up the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PoolLayout {
    assignments: Vec<WorkerAssignment>,
}

impl PoolLayout {
    pub fn from_plan(plan: &FunctionPlan, shared_workers: u32) -> Self {
        let mut shared: Vec<_> = plan.iter().filter(|spec| !spec.dedicated_only).collect();
        shared.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.name.cmp(&b.name)));

        let mut assignments = Vec::new();
        let shared_served = if shared.is_empty() { 0 } else { shared_workers };

        if shared_served > 0 {
            let functions: Vec<String> = shared.iter().map(|spec| spec.name.clone()).collect();
            for _ in 0..shared_served {
                assignments.push(WorkerAssignment {
                    kind: AssignmentKind::Shared,
                    functions: functions.clone(),
                });
            }
        }

        for spec in plan.iter() {
            let served = if spec.dedicated_only { 0 } else { shared_served };
            for _ in served..spec.worker_count {
                assignments.push(WorkerAssignment {
                    kind: AssignmentKind::Dedicated,
                    functions: vec![spec.name.clone()],
                });
            }
        }

        Self { assignments }
    }

    pub fn assignments(&self) -> &[WorkerAssignment] {
        &self.assignments
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Number of worker processes that register `function`
    pub fn coverage(&self, function: &str) -> usize {
        self.assignments
            .iter()
            .filter(|a| a.functions.iter().any(|f| f == function))
            .count()
    }
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
