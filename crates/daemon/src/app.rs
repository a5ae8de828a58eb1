// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Application entry point and role dispatch

use crate::args::{DaemonArgs, Role};
use crate::launcher::ExecLauncher;
use crate::lifecycle::{setup_logging, LifecycleError, Pool};
use crate::supervisor::Supervisor;
use clap::Parser;
use gp_adapters::{BrokerConnector, SignalNotifier, TracedBroker, TracingLogSink};
use gp_core::{HandlerRegistry, IdGen, StopFlag, SystemClock, UuidIdGen};
use gp_engine::{connect_with_retry, JobExecutor, StartupValidator, WorkerLoop};
use std::future::Future;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

/// A worker-pool application: its handlers and how to reach the broker
#[derive(Clone)]
pub struct App {
    registry: Arc<HandlerRegistry>,
    connector: Arc<dyn BrokerConnector>,
}

impl App {
    pub fn new(registry: HandlerRegistry, connector: impl BrokerConnector + 'static) -> Self {
        Self {
            registry: Arc::new(registry),
            connector: Arc::new(connector),
        }
    }

    /// Parse the process arguments and run the selected role
    pub fn run(self) -> ExitCode {
        self.run_with(DaemonArgs::parse())
    }

    pub fn run_with(self, args: DaemonArgs) -> ExitCode {
        let _log_guard = match setup_logging(args.log_file.as_deref(), args.log_level.as_deref()) {
            Ok(guard) => guard,
            Err(e) => {
                eprintln!("gearpool: {}", e);
                return ExitCode::FAILURE;
            }
        };

        let result = match args.role {
            Role::Supervise => self.supervise(&args),
            Role::Validate => self.validate(&args),
            Role::Worker => self.work(&args),
        };

        match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!(role = %args.role, error = %e, "exiting");
                ExitCode::FAILURE
            }
        }
    }

    fn supervise(&self, args: &DaemonArgs) -> Result<(), LifecycleError> {
        let pool = Pool::load(&args.config)?;
        info!(
            config = %args.config.display(),
            functions = pool.plan.len(),
            workers = pool.layout.len(),
            "starting pool"
        );

        let supervisor = Supervisor::new(ExecLauncher::current(args)?, pool.layout.len())
            .with_validation_timeout(pool.config.validation_timeout());

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        runtime.block_on(async move {
            let shutdown = shutdown_signal()?;
            supervisor.start(shutdown).await?;
            Ok::<(), LifecycleError>(())
        })
    }

    fn validate(&self, args: &DaemonArgs) -> Result<(), LifecycleError> {
        let pool = Pool::load(&args.config)?;
        let validator = StartupValidator::new(
            pool.resolver(Arc::clone(&self.registry)),
            SignalNotifier::to_parent(),
        );
        validator.validate()?;
        Ok(())
    }

    fn work(&self, args: &DaemonArgs) -> Result<(), LifecycleError> {
        let pool = Pool::load(&args.config)?;
        let functions = match args.assignment {
            Some(index) => pool
                .layout
                .assignments()
                .get(index)
                .map(|assignment| assignment.functions.clone())
                .ok_or(LifecycleError::UnknownAssignment(index))?,
            None => Vec::new(),
        };

        let stop = termination_flag()?;
        let Some(broker) = connect_with_retry(self.connector.as_ref(), &SystemClock, &stop) else {
            info!(kind = "proc", "worker stopped before reaching the broker");
            return Ok(());
        };
        let broker = TracedBroker::new(broker);

        let executor = JobExecutor::new(pool.resolver(Arc::clone(&self.registry)), TracingLogSink);
        let report = WorkerLoop::new(UuidIdGen.next_worker(), broker, executor, SystemClock)
            .with_endpoints(pool.config.endpoints().to_vec())
            .with_functions(functions)
            .with_limits(pool.config.run_limits(&mut rand::thread_rng()))
            .with_stop_flag(stop)
            .run()?;

        info!(
            kind = "proc",
            worker = %report.id,
            jobs = report.jobs_executed,
            reason = %report.reason,
            "worker finished"
        );
        Ok(())
    }
}

/// Stop flag raised on SIGTERM or SIGINT.
///
/// The handler can be installed only once per process, so every caller shares
/// the first flag.
fn termination_flag() -> Result<StopFlag, ctrlc::Error> {
    static INSTALLED: Mutex<Option<StopFlag>> = Mutex::new(None);

    let mut installed = INSTALLED.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(stop) = installed.as_ref() {
        return Ok(stop.clone());
    }
    let stop = StopFlag::new();
    let on_signal = stop.clone();
    ctrlc::set_handler(move || on_signal.request())?;
    *installed = Some(stop.clone());
    Ok(stop)
}

/// Resolves on the first SIGTERM or SIGINT
fn shutdown_signal() -> std::io::Result<impl Future<Output = ()>> {
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    Ok(async move {
        tokio::select! {
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
            _ = sigint.recv() => info!("Received SIGINT, shutting down..."),
        }
    })
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
