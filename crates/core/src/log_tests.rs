// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;
use serde_json::json;
use yare::parameterized;

#[test]
fn short_scalars_are_verbatim() {
    let text = "a".repeat(MAX_LOGGED_BYTES);
    assert!(matches!(truncate(&text), Cow::Borrowed(_)));
    assert_eq!(truncate(&text), text.as_str());
}

#[test]
fn long_scalars_are_cut_to_limit_plus_suffix() {
    let text = "b".repeat(MAX_LOGGED_BYTES + 1);
    let cut = truncate(&text);

    assert_eq!(cut.len(), MAX_LOGGED_BYTES + TRUNCATION_SUFFIX.len());
    assert!(cut.ends_with(TRUNCATION_SUFFIX));
    assert_eq!(&cut[..MAX_LOGGED_BYTES], &text[..MAX_LOGGED_BYTES]);
}

#[test]
fn truncation_never_splits_a_char() {
    // 255 ASCII bytes then a 3-byte char straddling the limit
    let text = format!("{}€tail", "x".repeat(MAX_LOGGED_BYTES - 1));
    let cut = truncate(&text);

    assert_eq!(cut, format!("{}{}", "x".repeat(MAX_LOGGED_BYTES - 1), TRUNCATION_SUFFIX));
}

#[parameterized(
    boolean = { json!(true), Some("true") },
    integer = { json!(42), Some("42") },
    float = { json!(1.5), Some("1.5") },
    string = { json!("hi"), Some("hi") },
    null = { json!(null), None },
    array = { json!([1]), None },
    object = { json!({"a": 1}), None },
)]
fn scalar_text_cases(value: Value, expected: Option<&str>) {
    assert_eq!(scalar_text(&value).as_deref(), expected);
}

#[test]
fn structured_values_render_one_line_each() {
    let lines = render_log_value(&json!({"user": "ann", "ids": [1, 2]}));

    assert_eq!(lines.first().map(String::as_str), Some("{"));
    assert_eq!(lines.last().map(String::as_str), Some("}"));
    assert!(lines.iter().any(|l| l.contains("\"user\": \"ann\"")));
    assert!(lines.len() > 3);
}

#[test]
fn structured_values_are_not_truncated() {
    let long = "z".repeat(MAX_LOGGED_BYTES * 2);
    let lines = render_log_value(&json!([long]));
    assert!(lines.iter().any(|l| l.contains(&long)));
}

#[test]
fn scalar_result_is_prefixed() {
    assert_eq!(render_result(&json!(true)), vec!["Result: true"]);
}

#[test]
fn long_result_is_truncated() {
    let lines = render_result(&json!("r".repeat(300)));
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("Result: rrr"));
    assert!(lines[0].ends_with(TRUNCATION_SUFFIX));
}

#[test]
fn null_result_renders_as_null() {
    assert_eq!(render_result(&Value::Null), vec!["null"]);
}

#[test]
fn entry_display_includes_handle() {
    let entry = LogEntry::new(LogLevel::WorkerInfo, "H:host:1", "processed hello");
    assert_eq!(entry.to_string(), "(H:host:1) processed hello");
}

#[test]
fn levels_order_from_most_to_least_important() {
    assert!(LogLevel::Error < LogLevel::Info);
    assert!(LogLevel::Info < LogLevel::ProcInfo);
    assert!(LogLevel::ProcInfo < LogLevel::WorkerInfo);
    assert!(LogLevel::WorkerInfo < LogLevel::Debug);
}

proptest! {
    #[test]
    fn ascii_truncation_is_exact(text in "[a-z]{0,600}") {
        let cut = truncate(&text);
        if text.len() > MAX_LOGGED_BYTES {
            prop_assert_eq!(cut.len(), MAX_LOGGED_BYTES + TRUNCATION_SUFFIX.len());
            prop_assert!(cut.starts_with(&text[..MAX_LOGGED_BYTES]));
        } else {
            prop_assert_eq!(cut.as_ref(), text.as_str());
        }
    }

    #[test]
    fn truncated_text_is_valid_prefix(text in ".{0,400}") {
        let cut = truncate(&text);
        let body = cut.strip_suffix(TRUNCATION_SUFFIX).unwrap_or(&cut);
        prop_assert!(text.starts_with(body));
        prop_assert!(body.len() <= MAX_LOGGED_BYTES);
    }
}
