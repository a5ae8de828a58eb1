// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gearpool daemon: process roles and the pool supervisor
//!
//! An application binary builds an [`App`] from its handler registry and
//! broker connector and calls [`App::run`]. The same binary then plays every
//! role: the supervisor re-executes it with a hidden `--role` flag to start
//! the startup validator and each worker process.

mod app;
mod args;
mod launcher;
mod lifecycle;
mod supervisor;

pub use app::App;
pub use args::{DaemonArgs, Role};
pub use launcher::{ChildRole, ExecLauncher, Launcher};
pub use lifecycle::{setup_logging, LifecycleError, Pool};
pub use supervisor::{StartupError, Supervisor, SupervisorReport};
