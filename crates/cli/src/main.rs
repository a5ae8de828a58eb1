// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! gp - gearpool operator CLI

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{check, plan};

#[derive(Parser)]
#[command(name = "gp", version, about = "gearpool - inspect worker pool configurations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the capacity plan and worker layout for a configuration
    Plan(plan::PlanArgs),
    /// Validate a configuration without starting anything
    Check(check::CheckArgs),
}

fn main() -> Result<()> {
    setup_logging();

    let cli = Cli::parse();
    match cli.command {
        Commands::Plan(args) => plan::plan(args),
        Commands::Check(args) => check::check(args),
    }
}

/// Warnings and errors to stderr; stdout stays machine-readable
fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).without_time())
        .try_init();
}
