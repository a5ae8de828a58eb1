// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::with_tracing;

#[test]
fn error_and_info_are_emitted_at_matching_levels() {
    let (logs, ()) = with_tracing(|| {
        TracingLogSink.log(LogEntry::new(LogLevel::Error, "H:1", "boom"));
        TracingLogSink.log(LogEntry::new(LogLevel::Info, "H:2", "no handler"));
    });

    assert!(logs.contains("ERROR"), "logs: {}", logs);
    assert!(logs.contains("boom"));
    assert!(logs.contains("INFO"));
    assert!(logs.contains("handle=H:2"));
}

#[test]
fn proc_info_is_tagged() {
    let (logs, ()) = with_tracing(|| {
        TracingLogSink.log(LogEntry::new(LogLevel::ProcInfo, "", "worker started"));
    });

    assert!(logs.contains("kind=\"proc\""), "logs: {}", logs);
}

#[test]
fn worker_output_and_results_are_verbose_levels() {
    let (logs, ()) = with_tracing(|| {
        TracingLogSink.log(LogEntry::new(LogLevel::WorkerInfo, "H:1", "processed hello"));
        TracingLogSink.log(LogEntry::new(LogLevel::Debug, "H:1", "Result: true"));
    });

    assert!(logs.contains("DEBUG"), "logs: {}", logs);
    assert!(logs.contains("processed hello"));
    assert!(logs.contains("TRACE"));
    assert!(logs.contains("Result: true"));
}

#[test]
fn fake_sink_records_entries() {
    let sink = FakeLogSink::new();
    sink.log(LogEntry::new(LogLevel::WorkerInfo, "H:1", "a"));
    sink.log(LogEntry::new(LogLevel::Debug, "H:1", "b"));

    assert_eq!(sink.entries().len(), 2);
    assert_eq!(sink.messages(LogLevel::Debug), vec!["b"]);
}
