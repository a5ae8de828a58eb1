// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line arguments shared by every process role

use clap::{Parser, ValueEnum};
use std::fmt;
use std::path::PathBuf;

/// Which part of the pool this process plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Role {
    /// Validate handlers, then start and supervise workers
    #[default]
    Supervise,
    /// Instantiate every planned handler once and report to the parent
    Validate,
    /// Poll the broker and run jobs
    Worker,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Supervise => "supervise",
            Role::Validate => "validate",
            Role::Worker => "worker",
        })
    }
}

#[derive(Debug, Clone, Parser)]
#[command(about = "Run and supervise a pool of job workers")]
pub struct DaemonArgs {
    /// Pool configuration file (TOML)
    #[arg(short, long)]
    pub config: PathBuf,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log filter, e.g. "info" or "gp_engine=debug" (overrides RUST_LOG)
    #[arg(long)]
    pub log_level: Option<String>,

    #[arg(long, value_enum, default_value_t = Role::Supervise, hide = true)]
    pub role: Role,

    /// Index into the pool layout (worker role only)
    #[arg(long, hide = true)]
    pub assignment: Option<usize>,
}

impl DaemonArgs {
    /// Arguments every child process inherits, without role flags
    pub fn inherited(&self) -> Vec<String> {
        let mut args = vec![
            "--config".to_string(),
            self.config.display().to_string(),
        ];
        if let Some(log_file) = &self.log_file {
            args.push("--log-file".to_string());
            args.push(log_file.display().to_string());
        }
        if let Some(level) = &self.log_level {
            args.push("--log-level".to_string());
            args.push(level.clone());
        }
        args
    }
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
