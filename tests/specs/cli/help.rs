//! Help output specs

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    let temp = Project::empty();
    temp.gp()
        .args(&["--help"])
        .passes()
        .stdout_has("plan")
        .stdout_has("check");
}

#[test]
fn missing_subcommand_fails() {
    let temp = Project::empty();
    temp.gp().fails().stderr_has("Usage");
}
