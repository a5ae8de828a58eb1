// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Broker endpoints

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 4730;

/// A broker server address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    #[error("empty host in endpoint {0:?}")]
    EmptyHost(String),
    #[error("invalid port in endpoint {0:?}")]
    InvalidPort(String),
}

impl FromStr for Endpoint {
    type Err = EndpointError;

    /// `host` or `host:port`; the port defaults to 4730
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (host, port) = match s.rsplit_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| EndpointError::InvalidPort(s.to_string()))?;
                (host, port)
            }
            None => (s, DEFAULT_PORT),
        };
        if host.is_empty() {
            return Err(EndpointError::EmptyHost(s.to_string()));
        }
        Ok(Self::new(host, port))
    }
}

#[cfg(test)]
#[path = "endpoint_tests.rs"]
mod tests;
