//! Shared helpers for CLI specs

use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

/// Two shared functions plus one dedicated-only function
pub const POOL_CONFIG: &str = r#"
count = 2
timeout = 30

[gearman_client]
servers = ["10.0.0.1:4730", "10.0.0.2"]

[gearman_workers]
reverse = "ReverseHandler"
resize = "ResizeHandler"
billing = "BillingHandler"

[functions.resize]
count = 3
priority = 5

[functions.billing]
dedicated_only = true
dedicated_count = 1
"#;

/// A scratch directory holding config files
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` to `rel`, creating parent directories
    pub fn file(&self, rel: &str, content: &str) {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    pub fn gp(&self) -> CliBuilder {
        CliBuilder::new(self.path())
    }
}

pub struct CliBuilder {
    cmd: Command,
}

impl CliBuilder {
    fn new(cwd: &Path) -> Self {
        let mut cmd = Command::cargo_bin("gp").unwrap();
        cmd.current_dir(cwd).env_remove("RUST_LOG");
        Self { cmd }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    /// Run and require a zero exit status
    pub fn passes(mut self) -> RunAssert {
        let output = self.cmd.output().unwrap();
        let run = RunAssert::from(output);
        assert!(
            run.success,
            "expected success\nstdout:\n{}\nstderr:\n{}",
            run.stdout, run.stderr
        );
        run
    }

    /// Run and require a non-zero exit status
    pub fn fails(mut self) -> RunAssert {
        let output = self.cmd.output().unwrap();
        let run = RunAssert::from(output);
        assert!(
            !run.success,
            "expected failure\nstdout:\n{}\nstderr:\n{}",
            run.stdout, run.stderr
        );
        run
    }
}

pub struct RunAssert {
    success: bool,
    stdout: String,
    stderr: String,
}

impl From<std::process::Output> for RunAssert {
    fn from(output: std::process::Output) -> Self {
        Self {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl RunAssert {
    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(
            self.stdout.contains(needle),
            "stdout missing {:?}:\n{}",
            needle,
            self.stdout
        );
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(
            self.stderr.contains(needle),
            "stderr missing {:?}:\n{}",
            needle,
            self.stderr
        );
        self
    }

    pub fn stdout_json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout).unwrap()
    }
}
