// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pool configuration TOML parsing

use gp_core::{
    CapacityPlanner, Endpoint, FunctionOptions, FunctionPlan, PlanError, PoolLayout, RunLimits,
};
use rand::Rng;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while loading a configuration file
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid format: {0}")]
    InvalidFormat(String),
}

/// `[gearman_client]`: where workers connect
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GearmanClient {
    pub host: String,
    pub port: u16,
    /// Extra `host[:port]` servers; when set, replaces `host`/`port`
    pub servers: Vec<String>,
}

impl Default for GearmanClient {
    fn default() -> Self {
        let endpoint = Endpoint::default();
        Self {
            host: endpoint.host,
            port: endpoint.port,
            servers: Vec::new(),
        }
    }
}

/// A parsed pool configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Workers that register every non-dedicated function
    pub count: u32,
    pub dedicated_count: Option<u32>,
    pub max_runs_per_worker: Option<u64>,
    /// Seconds; 0 disables the lifetime limit
    pub max_worker_lifetime: u64,
    /// Upper bound, in seconds, of the random extra lifetime per worker
    pub worker_restart_splay: u64,
    /// Default broker-side job timeout in seconds
    pub timeout: Option<u64>,
    /// Prepended to every handler id before registry lookup
    pub prefix: Option<String>,
    /// Seconds to wait for the startup validator
    pub validation_timeout: u64,
    pub gearman_client: GearmanClient,
    /// Function name -> handler id
    pub gearman_workers: BTreeMap<String, String>,
    pub functions: BTreeMap<String, FunctionOptions>,
    #[serde(skip)]
    endpoints: Vec<Endpoint>,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            count: 0,
            dedicated_count: None,
            max_runs_per_worker: None,
            max_worker_lifetime: 3600,
            worker_restart_splay: 600,
            timeout: None,
            prefix: None,
            validation_timeout: 30,
            gearman_client: GearmanClient::default(),
            gearman_workers: BTreeMap::new(),
            functions: BTreeMap::new(),
            endpoints: vec![Endpoint::default()],
        }
    }
}

impl ManagerConfig {
    /// Broker servers every worker connects to, in configured order
    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn planner(&self) -> CapacityPlanner {
        CapacityPlanner::new(self.count)
            .with_dedicated_count(self.dedicated_count)
            .with_default_timeout(self.timeout.filter(|&s| s > 0).map(Duration::from_secs))
    }

    /// Plan every configured function
    pub fn plan(&self) -> Result<FunctionPlan, PlanError> {
        self.planner().plan(&self.gearman_workers, &self.functions)
    }

    pub fn layout(&self, plan: &FunctionPlan) -> PoolLayout {
        PoolLayout::from_plan(plan, self.count)
    }

    /// Limits for one worker, its lifetime extended by a random splay so
    /// workers started together do not all restart together.
    pub fn run_limits(&self, rng: &mut impl Rng) -> RunLimits {
        let mut limits = RunLimits::unlimited();
        if self.max_worker_lifetime > 0 {
            let splay = rng.gen_range(0..=self.worker_restart_splay);
            limits = limits.with_max_run_time(Duration::from_secs(
                self.max_worker_lifetime.saturating_add(splay),
            ));
        }
        if let Some(max_runs) = self.max_runs_per_worker {
            limits = limits.with_max_runs(max_runs);
        }
        limits
    }

    pub fn validation_timeout(&self) -> Duration {
        Duration::from_secs(self.validation_timeout)
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref().filter(|p| !p.is_empty())
    }

    fn resolve_endpoints(&mut self) -> Result<(), ParseError> {
        let client = &self.gearman_client;
        self.endpoints = if client.servers.is_empty() {
            vec![Endpoint::new(client.host.clone(), client.port)]
        } else {
            client
                .servers
                .iter()
                .map(|s| {
                    s.parse::<Endpoint>().map_err(|e| {
                        ParseError::InvalidFormat(format!("gearman_client.servers: {}", e))
                    })
                })
                .collect::<Result<_, _>>()?
        };
        Ok(())
    }
}

/// Parse a configuration from TOML content
pub fn parse_config(content: &str) -> Result<ManagerConfig, ParseError> {
    let mut config: ManagerConfig = toml::from_str(content)?;

    if config.gearman_client.host.is_empty() {
        return Err(ParseError::InvalidFormat(
            "gearman_client.host must not be empty".to_string(),
        ));
    }
    if let Some((name, _)) = config.gearman_workers.iter().find(|(_, id)| id.is_empty()) {
        return Err(ParseError::InvalidFormat(format!(
            "gearman_workers.{} has an empty handler id",
            name
        )));
    }
    config.resolve_endpoints()?;

    Ok(config)
}

/// Read and parse a configuration file
pub fn load_config(path: &Path) -> Result<ManagerConfig, ParseError> {
    let content = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&content)?;
    tracing::debug!(
        path = %path.display(),
        functions = config.gearman_workers.len(),
        "loaded config"
    );
    Ok(config)
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
