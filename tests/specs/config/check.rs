//! `gp check` specs

use crate::prelude::*;

#[test]
fn valid_config_passes() {
    let temp = Project::empty();
    temp.file("pool.toml", POOL_CONFIG);

    temp.gp()
        .args(&["check", "--config", "pool.toml"])
        .passes()
        .stdout_has("ok: 3 functions, 4 worker processes");
}

#[test]
fn dedicated_only_without_count_fails() {
    let temp = Project::empty();
    temp.file(
        "pool.toml",
        r#"
[gearman_workers]
billing = "BillingHandler"

[functions.billing]
dedicated_only = true
"#,
    );

    temp.gp()
        .args(&["check", "--config", "pool.toml"])
        .fails()
        .stderr_has("billing");
}

#[test]
fn empty_pool_fails() {
    let temp = Project::empty();
    temp.file("pool.toml", "count = 2\n");

    temp.gp()
        .args(&["check", "--config", "pool.toml"])
        .fails()
        .stderr_has("no workers configured");
}

#[test]
fn missing_file_fails() {
    let temp = Project::empty();

    temp.gp()
        .args(&["check", "--config", "absent.toml"])
        .fails()
        .stderr_has("absent.toml");
}

#[test]
fn unknown_client_key_fails() {
    let temp = Project::empty();
    temp.file("pool.toml", "[gearman_client]\nhosts = \"x\"\n");

    temp.gp()
        .args(&["check", "--config", "pool.toml"])
        .fails();
}
