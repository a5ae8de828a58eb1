// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `gp plan` - Show the capacity plan and worker layout

use crate::output::{print, OutputFormat, PlanReport};
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct PlanArgs {
    /// Pool configuration file (TOML)
    #[arg(short, long)]
    pub config: PathBuf,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub fn plan(args: PlanArgs) -> Result<()> {
    let config = gp_config::load_config(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let plan = config.plan()?;
    let layout = config.layout(&plan);

    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    print(&PlanReport::new(&config, &plan, &layout), format)
}
