// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Function capacity planning
//!
//! Turns the configured `function -> handler` map plus per-function options
//! into a [`FunctionPlan`]: how many worker processes must serve each
//! function and which broker priority hint it carries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Lowest priority hint accepted by the broker
pub const MIN_PRIORITY: i32 = -5;
/// Highest priority hint accepted by the broker
pub const MAX_PRIORITY: i32 = 5;

/// Fatal capacity planning errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("invalid configuration for dedicated_count for function {function}")]
    MissingDedicatedCount { function: String },
}

/// Per-function options as they appear under `[functions.<name>]`
///
/// Zero counts behave exactly like absent ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FunctionOptions {
    /// Minimum number of workers that must serve this function
    pub count: Option<u32>,
    /// Only dedicated workers may register this function
    pub dedicated_only: bool,
    /// Workers reserved for this function alone
    pub dedicated_count: Option<u32>,
    /// Broker scheduling hint, clamped to `[MIN_PRIORITY, MAX_PRIORITY]`
    pub priority: Option<i64>,
    /// Broker-side job timeout in seconds
    pub timeout: Option<u64>,
}

/// Planned capacity for one job function. Immutable once planned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSpec {
    pub name: String,
    pub handler_id: String,
    pub dedicated_only: bool,
    pub worker_count: u32,
    pub priority: i32,
    pub timeout: Option<Duration>,
}

/// Every planned function, keyed and ordered by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionPlan {
    functions: BTreeMap<String, FunctionSpec>,
}

impl FunctionPlan {
    pub fn get(&self, name: &str) -> Option<&FunctionSpec> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FunctionSpec> {
        self.functions.values()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl FromIterator<FunctionSpec> for FunctionPlan {
    fn from_iter<I: IntoIterator<Item = FunctionSpec>>(iter: I) -> Self {
        Self {
            functions: iter
                .into_iter()
                .map(|spec| (spec.name.clone(), spec))
                .collect(),
        }
    }
}

/// Computes worker counts from global and per-function settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapacityPlanner {
    /// Shared workers that register every non-dedicated function (`count`)
    pub shared_minimum: u32,
    /// Global fallback for per-function `dedicated_count`
    pub dedicated_count: Option<u32>,
    /// Global fallback for per-function `timeout`
    pub default_timeout: Option<Duration>,
}

impl CapacityPlanner {
    pub fn new(shared_minimum: u32) -> Self {
        Self {
            shared_minimum,
            ..Self::default()
        }
    }

    pub fn with_dedicated_count(mut self, count: Option<u32>) -> Self {
        self.dedicated_count = count;
        self
    }

    pub fn with_default_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Plan every function in `workers`.
    ///
    /// Options for functions that have no handler mapping are ignored.
    pub fn plan(
        &self,
        workers: &BTreeMap<String, String>,
        options: &BTreeMap<String, FunctionOptions>,
    ) -> Result<FunctionPlan, PlanError> {
        for name in options.keys().filter(|name| !workers.contains_key(*name)) {
            tracing::warn!(
                function = %name,
                "options given for a function with no handler, ignoring"
            );
        }

        let defaults = FunctionOptions::default();
        let plan = workers
            .iter()
            .map(|(name, handler_id)| {
                let opts = options.get(name).unwrap_or(&defaults);
                self.plan_function(name, handler_id, opts)
            })
            .collect::<Result<FunctionPlan, _>>()?;

        tracing::info!(count = plan.len(), "loaded functions");
        Ok(plan)
    }

    /// Plan a single function
    pub fn plan_function(
        &self,
        name: &str,
        handler_id: &str,
        opts: &FunctionOptions,
    ) -> Result<FunctionSpec, PlanError> {
        let worker_count = if opts.dedicated_only {
            positive(opts.dedicated_count).ok_or_else(|| PlanError::MissingDedicatedCount {
                function: name.to_string(),
            })?
        } else {
            let mut min_count = self.shared_minimum.max(1);
            if let Some(count) = positive(opts.count) {
                min_count = min_count.max(count);
            }
            let dedicated_ceiling = match positive(opts.dedicated_count)
                .or_else(|| positive(self.dedicated_count))
            {
                Some(dedicated) => self.shared_minimum.saturating_add(dedicated),
                None => min_count,
            };
            min_count.max(dedicated_ceiling)
        };

        Ok(FunctionSpec {
            name: name.to_string(),
            handler_id: handler_id.to_string(),
            dedicated_only: opts.dedicated_only,
            worker_count,
            priority: opts.priority.map(clamp_priority).unwrap_or(0),
            timeout: opts
                .timeout
                .filter(|&secs| secs > 0)
                .map(Duration::from_secs)
                .or(self.default_timeout),
        })
    }
}

/// Clamp a configured priority into the broker's accepted range.
///
/// Out-of-range values are never rejected.
pub fn clamp_priority(priority: i64) -> i32 {
    priority.clamp(i64::from(MIN_PRIORITY), i64::from(MAX_PRIORITY)) as i32
}

fn positive(value: Option<u32>) -> Option<u32> {
    value.filter(|&n| n > 0)
}

#[cfg(test)]
#[path = "function_tests.rs"]
mod tests;
