// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process lifecycle: logging setup and pool loading

use crate::supervisor::StartupError;
use gp_config::{load_config, ManagerConfig, ParseError};
use gp_core::{FunctionPlan, HandlerRegistry, PlanError, PoolLayout, Resolver};
use gp_engine::{ValidationError, WorkerError};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;

/// Errors that end a pool process
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("config error: {0}")]
    Config(#[from] ParseError),
    #[error("{0}")]
    Plan(#[from] PlanError),
    #[error("logging setup failed: {0}")]
    Logging(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("startup failed: {0}")]
    Startup(#[from] StartupError),
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("worker error: {0}")]
    Worker(#[from] WorkerError),
    #[error("failed to install signal handler: {0}")]
    Signal(#[from] ctrlc::Error),
    #[error("assignment {0} is not in the pool layout")]
    UnknownAssignment(usize),
}

/// A loaded configuration with its plan and layout
#[derive(Debug, Clone)]
pub struct Pool {
    pub config: ManagerConfig,
    pub plan: Arc<FunctionPlan>,
    pub layout: PoolLayout,
}

impl Pool {
    /// Load and plan the configuration at `path`
    pub fn load(path: &Path) -> Result<Self, LifecycleError> {
        let config = load_config(path)?;
        Self::from_config(config)
    }

    pub fn from_config(config: ManagerConfig) -> Result<Self, LifecycleError> {
        let plan = config.plan()?;
        let layout = config.layout(&plan);
        Ok(Self {
            config,
            plan: Arc::new(plan),
            layout,
        })
    }

    /// Resolver over this pool's plan, shared by validation and execution
    pub fn resolver(&self, registry: Arc<HandlerRegistry>) -> Resolver {
        Resolver::new(Arc::clone(&self.plan), registry)
            .with_prefix(self.config.prefix().map(str::to_string))
    }
}

/// Install the global subscriber.
///
/// Logs go to `log_file` when given, stderr otherwise. The returned guard
/// must be held until exit so buffered lines are flushed.
pub fn setup_logging(
    log_file: Option<&Path>,
    level: Option<&str>,
) -> Result<Option<WorkerGuard>, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = match level {
        Some(level) => {
            EnvFilter::try_new(level).map_err(|e| LifecycleError::Logging(e.to_string()))?
        }
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let Some(log_file) = log_file else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| LifecycleError::Logging(e.to_string()))?;
        return Ok(None);
    };

    // Create log directory if needed
    let dir = match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let file_name = log_file
        .file_name()
        .ok_or_else(|| LifecycleError::Logging(format!("not a file: {}", log_file.display())))?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
        .try_init()
        .map_err(|e| LifecycleError::Logging(e.to_string()))?;

    Ok(Some(guard))
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
