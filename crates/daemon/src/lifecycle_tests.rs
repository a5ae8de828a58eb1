// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use gp_core::{HandlerOutput, JobInvocation};
use std::io::Write;

const CONFIG: &str = r#"
count = 1
prefix = "Jobs::"

[gearman_workers]
reverse = "Reverse"
billing = "Billing"

[functions.billing]
dedicated_only = true
dedicated_count = 2
"#;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn pool_load_plans_and_lays_out() {
    let file = write_config(CONFIG);
    let pool = Pool::load(file.path()).unwrap();

    assert_eq!(pool.plan.len(), 2);
    // one shared worker for reverse, two dedicated for billing
    assert_eq!(pool.layout.len(), 3);
    assert_eq!(pool.layout.coverage("billing"), 2);
}

#[test]
fn pool_load_rejects_missing_dedicated_count() {
    let file = write_config(
        "[gearman_workers]\nbilling = \"Billing\"\n[functions.billing]\ndedicated_only = true\n",
    );

    let err = Pool::load(file.path()).unwrap_err();
    assert!(matches!(err, LifecycleError::Plan(_)));
    assert_eq!(
        err.to_string(),
        "invalid configuration for dedicated_count for function billing"
    );
}

#[test]
fn pool_load_reports_bad_toml() {
    let file = write_config("count = [");
    assert!(matches!(
        Pool::load(file.path()).unwrap_err(),
        LifecycleError::Config(_)
    ));
}

#[test]
fn pool_resolver_applies_prefix() {
    let pool = Pool::from_config(gp_config::parse_config(CONFIG).unwrap()).unwrap();
    let registry = HandlerRegistry::new().with_handler("Jobs::Reverse", || {
        |_: &JobInvocation| HandlerOutput::new(true)
    });

    let resolver = pool.resolver(Arc::new(registry));
    assert_eq!(resolver.resolve("reverse").as_deref(), Some("Jobs::Reverse"));
    assert!(resolver.instantiate("reverse").is_ok());
}

#[test]
fn invalid_log_filter_is_rejected() {
    let err = setup_logging(None, Some("gp_engine=loudest")).unwrap_err();
    assert!(matches!(err, LifecycleError::Logging(_)));
}
