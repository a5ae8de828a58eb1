// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Starting helper and worker processes

use crate::args::{DaemonArgs, Role};
use std::io;
use std::path::PathBuf;
use tokio::process::{Child, Command};

/// What a launched child process does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildRole {
    Validate,
    Worker { assignment: usize },
}

impl ChildRole {
    /// Flags selecting this role on the command line
    pub fn args(&self) -> Vec<String> {
        match self {
            ChildRole::Validate => vec!["--role".to_string(), Role::Validate.to_string()],
            ChildRole::Worker { assignment } => vec![
                "--role".to_string(),
                Role::Worker.to_string(),
                "--assignment".to_string(),
                assignment.to_string(),
            ],
        }
    }
}

/// Starts child processes for the supervisor
pub trait Launcher: Send + Sync {
    fn launch(&self, role: ChildRole) -> io::Result<Child>;
}

/// Re-executes a program (normally the current binary) with a role flag
#[derive(Debug, Clone)]
pub struct ExecLauncher {
    program: PathBuf,
    args: Vec<String>,
}

impl ExecLauncher {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Launcher for the running executable with the caller's arguments
    pub fn current(args: &DaemonArgs) -> io::Result<Self> {
        Ok(Self::new(std::env::current_exe()?, args.inherited()))
    }
}

impl Launcher for ExecLauncher {
    fn launch(&self, role: ChildRole) -> io::Result<Child> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .args(role.args())
            .spawn()?;
        tracing::info!(kind = "proc", pid = child.id(), ?role, "started child");
        Ok(child)
    }
}

#[cfg(test)]
#[path = "launcher_tests.rs"]
mod tests;
