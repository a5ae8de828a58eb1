// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `gp check` - Validate a configuration

use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct CheckArgs {
    /// Pool configuration file (TOML)
    #[arg(short, long)]
    pub config: PathBuf,
}

pub fn check(args: CheckArgs) -> Result<()> {
    let config = gp_config::load_config(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let plan = config.plan()?;
    if plan.is_empty() {
        bail!("no workers configured");
    }
    let layout = config.layout(&plan);
    for spec in plan.iter() {
        tracing::debug!(
            function = %spec.name,
            handler = %spec.handler_id,
            workers = spec.worker_count,
            "planned"
        );
    }

    println!(
        "ok: {} functions, {} worker processes",
        plan.len(),
        layout.len()
    );
    Ok(())
}
