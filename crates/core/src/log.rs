// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job log entries: levels, rendering and truncation
//!
//! Only what gets logged and at which level is decided here; the transport
//! lives behind the log sink adapter.

use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;

/// Longest scalar logged verbatim, in bytes
pub const MAX_LOGGED_BYTES: usize = 256;

/// Appended to scalars cut at [`MAX_LOGGED_BYTES`]
pub const TRUNCATION_SUFFIX: &str = "...(truncated)";

/// Log levels, most to least important
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum LogLevel {
    Error,
    Info,
    /// Process lifecycle (spawn, exit, signals)
    ProcInfo,
    /// Output produced by job handlers
    WorkerInfo,
    Debug,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogLevel::Error => "error",
            LogLevel::Info => "info",
            LogLevel::ProcInfo => "proc_info",
            LogLevel::WorkerInfo => "worker_info",
            LogLevel::Debug => "debug",
        })
    }
}

/// One line destined for the log sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub level: LogLevel,
    /// Handle of the job the line belongs to
    pub handle: String,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, handle: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            handle: handle.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {}", self.handle, self.message)
    }
}

/// Cut `text` to [`MAX_LOGGED_BYTES`] and mark it as truncated.
///
/// The cut backs off to the nearest char boundary, so multi-byte text may
/// keep slightly fewer than 256 bytes.
pub fn truncate(text: &str) -> Cow<'_, str> {
    if text.len() <= MAX_LOGGED_BYTES {
        return Cow::Borrowed(text);
    }
    let mut end = MAX_LOGGED_BYTES;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    Cow::Owned(format!("{}{}", &text[..end], TRUNCATION_SUFFIX))
}

/// Text form of a scalar, or `None` for null, arrays and objects
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Lines to log for a structured value: one per rendered line, trimmed
pub fn structured_lines(value: &Value) -> Vec<String> {
    let rendered = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    rendered.trim().lines().map(str::to_string).collect()
}

/// Lines to log for a handler log entry
pub fn render_log_value(value: &Value) -> Vec<String> {
    match scalar_text(value) {
        Some(text) => vec![truncate(&text).into_owned()],
        None => structured_lines(value),
    }
}

/// Lines to log for a handler result
pub fn render_result(value: &Value) -> Vec<String> {
    match scalar_text(value) {
        Some(text) => vec![format!("Result: {}", truncate(&text))],
        None => structured_lines(value),
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
