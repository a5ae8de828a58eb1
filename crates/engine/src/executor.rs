// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job execution wrapper
//!
//! Resolves a fresh handler per job, runs it and reports its log buffer and
//! result to the log sink.

use gp_adapters::LogSink;
use gp_core::log::{render_log_value, render_result};
use gp_core::{HandlerOutput, JobInvocation, JobOutput, LogEntry, LogLevel, Resolver};

/// Result of one [`JobExecutor::execute`] call
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    /// Value for the broker client; `None` when no handler ran
    pub output: Option<JobOutput>,
    /// Whether a handler was invoked. Only invoked jobs count toward limits.
    pub invoked: bool,
}

impl Execution {
    fn skipped() -> Self {
        Self {
            output: None,
            invoked: false,
        }
    }
}

/// Runs jobs against handlers from the resolver
pub struct JobExecutor<L> {
    resolver: Resolver,
    sink: L,
}

impl<L: LogSink> JobExecutor<L> {
    pub fn new(resolver: Resolver, sink: L) -> Self {
        Self { resolver, sink }
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Execute a single job with tracing
    pub fn execute(&self, job: &JobInvocation) -> Execution {
        let span = tracing::info_span!("job", handle = %job.handle, function = %job.function_name);
        let _guard = span.enter();

        tracing::debug!(workload = %job.workload(), "starting job");

        let mut handler = match self.resolver.instantiate(&job.function_name) {
            Ok(handler) => handler,
            Err(e) => {
                let level = if e.is_unresolved() {
                    LogLevel::Info
                } else {
                    LogLevel::Error
                };
                self.sink.log(LogEntry::new(level, &job.handle, e.to_string()));
                return Execution::skipped();
            }
        };

        let start = std::time::Instant::now();
        let HandlerOutput { result, log } = handler.run(job);
        tracing::debug!(elapsed_ms = start.elapsed().as_millis() as u64, "handler returned");

        for line in log.iter().flat_map(render_log_value) {
            self.sink.log(LogEntry::new(LogLevel::WorkerInfo, &job.handle, line));
        }
        for line in render_result(&result) {
            self.sink.log(LogEntry::new(LogLevel::Debug, &job.handle, line));
        }

        Execution {
            output: Some(JobOutput::coerce(result)),
            invoked: true,
        }
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
