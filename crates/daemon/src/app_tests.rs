// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use gp_adapters::{BrokerCall, FakeBroker, FakeConnector};
use gp_core::{HandlerOutput, JobInvocation, JobOutput};
use std::io::Write;

const CONFIG: &str = r#"
count = 1
max_runs_per_worker = 1

[gearman_client]
servers = ["broker-a:4730", "broker-b:4731"]

[gearman_workers]
reverse = "Reverse"
"#;

fn app(broker: &FakeBroker) -> App {
    let registry = HandlerRegistry::new().with_handler("Reverse", || {
        |job: &JobInvocation| HandlerOutput::new(job.workload().chars().rev().collect::<String>())
    });
    App::new(registry, FakeConnector::new(broker.clone()))
}

fn args(config: &std::path::Path, assignment: Option<usize>) -> DaemonArgs {
    DaemonArgs {
        config: config.to_path_buf(),
        log_file: None,
        log_level: None,
        role: Role::Worker,
        assignment,
    }
}

fn config_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CONFIG.as_bytes()).unwrap();
    file
}

#[test]
fn worker_role_runs_its_assignment() {
    let file = config_file();
    let broker = FakeBroker::new();
    broker.push_job(JobInvocation::new("reverse", "H:1", "hello"));

    app(&broker).work(&args(file.path(), Some(0))).unwrap();

    let calls = broker.calls();
    assert_eq!(calls[0], BrokerCall::AddServer(gp_core::Endpoint::new("broker-a", 4730)));
    assert_eq!(calls[1], BrokerCall::AddServer(gp_core::Endpoint::new("broker-b", 4731)));
    assert_eq!(broker.registered(), vec!["reverse"]);
    assert_eq!(
        broker.results(),
        vec![("H:1".to_string(), Some(JobOutput::Text("olleh".to_string())))]
    );
    assert_eq!(calls.last(), Some(&BrokerCall::UnregisterAll));
}

#[test]
fn worker_role_rejects_unknown_assignment() {
    let file = config_file();
    let err = app(&FakeBroker::new())
        .work(&args(file.path(), Some(9)))
        .unwrap_err();

    assert!(matches!(err, LifecycleError::UnknownAssignment(9)));
}
