// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup validation
//!
//! Runs in a throwaway helper process before any worker is started. Every
//! planned function must instantiate through the same resolver the workers
//! use; the parent learns the outcome from a signal and the exit status.

use crate::error::ValidationError;
use gp_adapters::ParentNotifier;
use gp_core::{PoolSignal, Resolver};

pub struct StartupValidator<N> {
    resolver: Resolver,
    notifier: N,
}

impl<N: ParentNotifier> StartupValidator<N> {
    pub fn new(resolver: Resolver, notifier: N) -> Self {
        Self { resolver, notifier }
    }

    /// Instantiate every planned function once.
    ///
    /// Returns the number of validated functions. Stops at the first failure.
    pub fn validate(&self) -> Result<usize, ValidationError> {
        let plan = self.resolver.plan();
        if plan.is_empty() {
            tracing::error!("no workers configured");
            self.notify(PoolSignal::NoWorkers);
            return Err(ValidationError::NoWorkers);
        }

        for spec in plan.iter() {
            if let Err(e) = self.resolver.instantiate(&spec.name) {
                tracing::error!(function = %spec.name, error = %e, "handler validation failed");
                self.notify(PoolSignal::ValidationFailed);
                return Err(e.into());
            }
            tracing::debug!(function = %spec.name, handler = %spec.handler_id, "handler ok");
        }

        tracing::info!(count = plan.len(), "all handlers validated");
        Ok(plan.len())
    }

    fn notify(&self, signal: PoolSignal) {
        if let Err(e) = self.notifier.notify(signal) {
            tracing::warn!(error = %e, "failed to notify parent");
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
