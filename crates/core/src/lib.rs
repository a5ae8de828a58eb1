// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gp-core: Core types for the gearpool worker-pool manager
//!
//! This crate provides:
//! - Capacity planning from configured function options
//! - The handler registry and the resolver shared by validation and execution
//! - Job invocations, typed outputs and log entry rendering
//! - Clock and id abstractions for deterministic tests

pub mod clock;
pub mod endpoint;
pub mod function;
pub mod handler;
pub mod id;
pub mod layout;
pub mod limits;
pub mod log;
pub mod output;
pub mod registry;
pub mod signal;

pub use clock::{Clock, FakeClock, SystemClock};
pub use endpoint::{Endpoint, EndpointError};
pub use function::{
    clamp_priority, CapacityPlanner, FunctionOptions, FunctionPlan, FunctionSpec, PlanError,
    MAX_PRIORITY, MIN_PRIORITY,
};
pub use handler::{HandlerOutput, JobHandler, JobInvocation};
pub use id::{IdGen, UuidIdGen, WorkerId};
pub use layout::{AssignmentKind, PoolLayout, WorkerAssignment};
pub use limits::RunLimits;
pub use log::{LogEntry, LogLevel};
pub use output::JobOutput;
pub use registry::{HandlerRegistry, ResolveError, Resolver, Service, ServiceError, ServiceFactory};
pub use signal::{PoolSignal, StopFlag};
