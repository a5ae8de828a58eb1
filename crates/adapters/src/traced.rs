// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::broker::{BrokerError, BrokerWorker, Dispatch, ReturnCode};
use gp_core::Endpoint;
use std::time::Duration;

/// Wrapper that adds tracing to any BrokerWorker
#[derive(Clone)]
pub struct TracedBroker<B> {
    inner: B,
}

impl<B> TracedBroker<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }
}

impl<B: BrokerWorker> BrokerWorker for TracedBroker<B> {
    fn add_server(&mut self, endpoint: &Endpoint) -> Result<(), BrokerError> {
        let span = tracing::info_span!("broker.add_server", %endpoint);
        let _guard = span.enter();

        let result = self.inner.add_server(endpoint);
        match &result {
            Ok(()) => tracing::info!("server added"),
            Err(e) => tracing::error!(error = %e, "add server failed"),
        }
        result
    }

    fn add_function(&mut self, name: &str, timeout: Option<Duration>) -> Result<(), BrokerError> {
        let span = tracing::info_span!("broker.add_function", function = name);
        let _guard = span.enter();

        let result = self.inner.add_function(name, timeout);
        match &result {
            Ok(()) => tracing::info!(timeout_secs = timeout.map(|t| t.as_secs()), "registered"),
            Err(e) => tracing::error!(error = %e, "registration failed"),
        }
        result
    }

    fn work(&mut self, dispatch: &mut Dispatch<'_>) -> ReturnCode {
        let code = self.inner.work(dispatch);
        match &code {
            ReturnCode::Success | ReturnCode::NoJobs | ReturnCode::IoWait => {
                tracing::trace!(%code, "work")
            }
            ReturnCode::NoActiveConnections => tracing::warn!("no active broker connections"),
            ReturnCode::Timeout | ReturnCode::Failure(_) => tracing::warn!(%code, "work failed"),
        }
        code
    }

    fn wait(&mut self) -> ReturnCode {
        let code = self.inner.wait();
        tracing::trace!(%code, "wait");
        code
    }

    fn unregister_all(&mut self) -> Result<(), BrokerError> {
        let result = self.inner.unregister_all();
        // The worker is exiting either way
        match &result {
            Ok(()) => tracing::info!("unregistered all functions"),
            Err(e) => tracing::warn!(error = %e, "unregister failed (may be expected)"),
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
