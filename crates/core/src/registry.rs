// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Handler registry and resolution
//!
//! The registry is the dispatch table the application fills at startup:
//! handler id -> factory. Factories may hand back something that is not a
//! job handler, or fail outright, which is how runtime wiring problems
//! surface. [`Resolver`] is the single lookup path used both by the startup
//! validator and by job execution.

use crate::function::FunctionPlan;
use crate::handler::JobHandler;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// What a factory produced
pub enum Service {
    Handler(Box<dyn JobHandler>),
    /// Bound under a handler id but unable to run jobs
    Other { type_name: &'static str },
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Handler(_) => f.write_str("Service::Handler(..)"),
            Service::Other { type_name } => write!(f, "Service::Other({})", type_name),
        }
    }
}

/// Failure inside a service factory
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ServiceError(pub String);

/// Builds a fresh service on every call
pub trait ServiceFactory: Send + Sync {
    fn create(&self) -> Result<Service, ServiceError>;
}

impl<F> ServiceFactory for F
where
    F: Fn() -> Result<Service, ServiceError> + Send + Sync,
{
    fn create(&self) -> Result<Service, ServiceError> {
        self()
    }
}

/// Handler id -> factory table
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    services: HashMap<String, Arc<dyn ServiceFactory>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job handler built by `make` for every job
    pub fn with_handler<H, F>(self, id: impl Into<String>, make: F) -> Self
    where
        H: JobHandler + 'static,
        F: Fn() -> H + Send + Sync + 'static,
    {
        self.with_service(id, move || -> Result<Service, ServiceError> {
            Ok(Service::Handler(Box::new(make())))
        })
    }

    /// Register an arbitrary service factory
    pub fn with_service(
        mut self,
        id: impl Into<String>,
        factory: impl ServiceFactory + 'static,
    ) -> Self {
        self.services.insert(id.into(), Arc::new(factory));
        self
    }

    pub fn contains(&self, id: &str) -> bool {
        self.services.contains_key(id)
    }

    /// Build the service bound to `id`, if any
    pub fn create(&self, id: &str) -> Option<Result<Service, ServiceError>> {
        self.services.get(id).map(|factory| factory.create())
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.services.keys().collect();
        ids.sort();
        f.debug_struct("HandlerRegistry").field("ids", &ids).finish()
    }
}

/// Why a function could not be turned into a runnable handler
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("function {function} is not a registered job name")]
    NotRegistered { function: String },

    #[error("handler {handler_id} for function {function} not found")]
    NotFound {
        function: String,
        handler_id: String,
    },

    #[error("service {handler_id} for function {function} is a {type_name}, not a job handler")]
    NotAHandler {
        function: String,
        handler_id: String,
        type_name: &'static str,
    },

    #[error("failed to construct handler {handler_id} for function {function}: {source}")]
    Construction {
        function: String,
        handler_id: String,
        #[source]
        source: ServiceError,
    },
}

impl ResolveError {
    /// No handler exists at all, as opposed to one that exists but is unusable
    pub fn is_unresolved(&self) -> bool {
        matches!(
            self,
            ResolveError::NotRegistered { .. } | ResolveError::NotFound { .. }
        )
    }
}

/// Maps job function names to live handler instances
#[derive(Debug, Clone)]
pub struct Resolver {
    plan: Arc<FunctionPlan>,
    registry: Arc<HandlerRegistry>,
    prefix: Option<String>,
}

impl Resolver {
    pub fn new(plan: Arc<FunctionPlan>, registry: Arc<HandlerRegistry>) -> Self {
        Self {
            plan,
            registry,
            prefix: None,
        }
    }

    /// Prefix prepended to every handler id before registry lookup
    pub fn with_prefix(mut self, prefix: Option<String>) -> Self {
        self.prefix = prefix.filter(|p| !p.is_empty());
        self
    }

    pub fn plan(&self) -> &FunctionPlan {
        &self.plan
    }

    /// Registry key for `function`, or `None` if it is not planned
    pub fn resolve(&self, function: &str) -> Option<String> {
        let Some(spec) = self.plan.get(function) else {
            tracing::debug!(function, "function has no handler mapping");
            return None;
        };
        Some(match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, spec.handler_id),
            None => spec.handler_id.clone(),
        })
    }

    /// Resolve `function` and build a fresh handler instance for it
    pub fn instantiate(&self, function: &str) -> Result<Box<dyn JobHandler>, ResolveError> {
        let handler_id = self
            .resolve(function)
            .ok_or_else(|| ResolveError::NotRegistered {
                function: function.to_string(),
            })?;

        let service = self
            .registry
            .create(&handler_id)
            .ok_or_else(|| ResolveError::NotFound {
                function: function.to_string(),
                handler_id: handler_id.clone(),
            })?
            .map_err(|source| ResolveError::Construction {
                function: function.to_string(),
                handler_id: handler_id.clone(),
                source,
            })?;

        match service {
            Service::Handler(handler) => Ok(handler),
            Service::Other { type_name } => Err(ResolveError::NotAHandler {
                function: function.to_string(),
                handler_id,
                type_name,
            }),
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
