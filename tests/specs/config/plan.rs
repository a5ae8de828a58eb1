//! `gp plan` specs
//!
//! Worker counts, dedicated workers and server lists as an operator sees them.

use crate::prelude::*;

#[test]
fn plan_prints_servers_and_functions() {
    let temp = Project::empty();
    temp.file("pool.toml", POOL_CONFIG);

    temp.gp()
        .args(&["plan", "--config", "pool.toml"])
        .passes()
        .stdout_has("Servers: 10.0.0.1:4730, 10.0.0.2:4730")
        .stdout_has("ResizeHandler")
        .stdout_has("Workers: 4 (2 shared, 2 dedicated)");
}

#[test]
fn plan_json_reports_counts() {
    let temp = Project::empty();
    temp.file("pool.toml", POOL_CONFIG);

    let run = temp
        .gp()
        .args(&["plan", "--config", "pool.toml", "--json"])
        .passes();
    let json = run.stdout_json();

    let functions = json["functions"].as_array().unwrap();
    let count = |name: &str| {
        functions
            .iter()
            .find(|f| f["name"] == name)
            .map(|f| f["workers"].clone())
            .unwrap()
    };
    assert_eq!(count("reverse"), 2);
    assert_eq!(count("resize"), 3);
    assert_eq!(count("billing"), 1);
    assert_eq!(json["workers"].as_array().unwrap().len(), 4);
}

#[test]
fn shared_workers_register_by_priority() {
    let temp = Project::empty();
    temp.file("pool.toml", POOL_CONFIG);

    let run = temp
        .gp()
        .args(&["plan", "--config", "pool.toml", "--json"])
        .passes();
    let json = run.stdout_json();

    assert_eq!(json["workers"][0]["kind"], "shared");
    assert_eq!(
        json["workers"][0]["functions"],
        serde_json::json!(["resize", "reverse"])
    );
}

#[test]
fn dedicated_count_raises_shared_functions() {
    let temp = Project::empty();
    temp.file(
        "pool.toml",
        r#"
count = 1
dedicated_count = 2

[gearman_workers]
reverse = "ReverseHandler"
"#,
    );

    temp.gp()
        .args(&["plan", "--config", "pool.toml"])
        .passes()
        .stdout_has("Workers: 3 (1 shared, 2 dedicated)");
}
