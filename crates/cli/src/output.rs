// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use gp_config::ManagerConfig;
use gp_core::{AssignmentKind, FunctionPlan, PoolLayout, WorkerAssignment};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Print output in the specified format
pub fn print<T: Serialize + fmt::Display>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => print!("{}", value),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

/// One planned function, flattened for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionRow {
    pub name: String,
    pub handler: String,
    pub workers: u32,
    pub priority: i32,
    pub dedicated_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Everything `gp plan` reports
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub servers: Vec<String>,
    pub functions: Vec<FunctionRow>,
    pub workers: Vec<WorkerAssignment>,
}

impl PlanReport {
    pub fn new(config: &ManagerConfig, plan: &FunctionPlan, layout: &PoolLayout) -> Self {
        Self {
            servers: config.endpoints().iter().map(|e| e.to_string()).collect(),
            functions: plan
                .iter()
                .map(|spec| FunctionRow {
                    name: spec.name.clone(),
                    handler: spec.handler_id.clone(),
                    workers: spec.worker_count,
                    priority: spec.priority,
                    dedicated_only: spec.dedicated_only,
                    timeout_secs: spec.timeout.map(|t| t.as_secs()),
                })
                .collect(),
            workers: layout.assignments().to_vec(),
        }
    }
}

impl fmt::Display for PlanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Servers: {}", self.servers.join(", "))?;
        writeln!(f)?;

        let width = self
            .functions
            .iter()
            .map(|row| row.name.len())
            .max()
            .unwrap_or(0)
            .max("FUNCTION".len());
        writeln!(
            f,
            "{:<width$}  {:>7}  {:>8}  {:<9}  HANDLER",
            "FUNCTION", "WORKERS", "PRIORITY", "DEDICATED"
        )?;
        for row in &self.functions {
            writeln!(
                f,
                "{:<width$}  {:>7}  {:>8}  {:<9}  {}",
                row.name,
                row.workers,
                row.priority,
                if row.dedicated_only { "yes" } else { "no" },
                row.handler
            )?;
        }
        writeln!(f)?;

        let shared = self
            .workers
            .iter()
            .filter(|w| w.kind == AssignmentKind::Shared)
            .count();
        writeln!(
            f,
            "Workers: {} ({} shared, {} dedicated)",
            self.workers.len(),
            shared,
            self.workers.len() - shared
        )?;
        for (index, worker) in self.workers.iter().enumerate() {
            writeln!(f, "  #{} {}: {}", index, worker.kind, worker.functions.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
