// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed job results handed back to the broker client

use serde_json::Value;
use std::fmt;

/// Value returned to the client that submitted a job.
///
/// The variant records the handler result's type so a boolean `true` is not
/// flattened into the string `"1"` on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutput {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Arrays and objects, serialized as JSON
    Structured(Value),
    Empty,
}

impl JobOutput {
    /// Type-preserving conversion from a handler result
    pub fn coerce(value: Value) -> Self {
        match value {
            Value::Null => JobOutput::Empty,
            Value::Bool(b) => JobOutput::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => JobOutput::Int(i),
                None => JobOutput::Float(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => JobOutput::Text(s),
            other @ (Value::Array(_) | Value::Object(_)) => JobOutput::Structured(other),
        }
    }
}

impl fmt::Display for JobOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobOutput::Bool(b) => write!(f, "{}", b),
            JobOutput::Int(i) => write!(f, "{}", i),
            JobOutput::Float(x) => write!(f, "{}", x),
            JobOutput::Text(s) => f.write_str(s),
            JobOutput::Structured(v) => write!(f, "{}", v),
            JobOutput::Empty => Ok(()),
        }
    }
}

impl From<Value> for JobOutput {
    fn from(value: Value) -> Self {
        JobOutput::coerce(value)
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
