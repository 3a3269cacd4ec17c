//! Integration tests for the compatibility pipeline with a stub package
//! manager and a fake example runner.

#![cfg(unix)]

use async_trait::async_trait;
use depcompat_core::{ExampleConfig, RunConfig, RunError};
use depcompat_run::{CompatPipeline, ExampleRunner};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

const MANIFEST: &[u8] = b"{\"name\":\"fixture\",\"private\":true}\n";

/// Fake runner that fails on configured call indices (0-based call order).
struct FakeRunner {
    calls: AtomicUsize,
    fail_on: Vec<usize>,
}

impl FakeRunner {
    fn passing() -> Self {
        Self::failing_on(&[])
    }

    fn failing_on(indices: &[usize]) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_on: indices.to_vec(),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExampleRunner for FakeRunner {
    async fn execute(&self, _config: &ExampleConfig) -> Result<(), RunError> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on.contains(&index) {
            Err(RunError::ExampleExecFailed {
                output: format!("fixture failure for call {}", index),
            })
        } else {
            Ok(())
        }
    }
}

/// Write an executable stub package-manager script into the workspace.
fn write_stub_pm(workdir: &Path, body: &str) -> String {
    let script = workdir.join("pm.sh");
    std::fs::write(&script, format!("#!/bin/sh\n{}\n", body)).expect("write script");
    let mut permissions = std::fs::metadata(&script).expect("stat script").permissions();
    permissions.set_mode(0o755);
    std::fs::set_permissions(&script, permissions).expect("chmod script");
    script.to_string_lossy().to_string()
}

/// Workspace with a manifest and a stub installer that mutates the manifest,
/// prints both local names, and warns on stderr.
fn workspace_with_installer(stub_body: &str) -> (TempDir, RunConfig) {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("package.json"), MANIFEST).expect("write manifest");

    let package_manager = write_stub_pm(dir.path(), stub_body);
    let config = RunConfig {
        package_manager,
        ..RunConfig::for_workdir(dir.path().to_path_buf())
    };
    (dir, config)
}

/// Stub body for a successful install of webpack@5.88.0 + css-loader@6.8.1.
fn happy_install() -> &'static str {
    concat!(
        "echo '{\"mutated\":true}' > package.json\n",
        "echo 'warning something advisory' 1>&2\n",
        "echo 'webpack@5.88.0 css-loader@6.8.1'\n",
        "exit 0"
    )
}

/// Create example subdirectories holding a tool config.
fn add_examples(workdir: &Path, names: &[&str]) {
    for name in names {
        let sub = workdir
            .join("node_modules")
            .join("css-loader")
            .join("examples")
            .join(name);
        std::fs::create_dir_all(&sub).expect("create example dir");
        std::fs::write(sub.join("webpack.config.js"), "module.exports = {};")
            .expect("write tool config");
    }
}

fn manifest_bytes(workdir: &Path) -> Vec<u8> {
    std::fs::read(workdir.join("package.json")).expect("read manifest")
}

#[tokio::test]
async fn test_invalid_tool_version_aborts_before_install() {
    let (dir, config) = workspace_with_installer("touch installed.marker");
    let runner = FakeRunner::passing();

    let err = CompatPipeline::run("not a version", "css-loader@6.8.1", &config, &runner)
        .await
        .expect_err("should fail");

    assert_eq!(err.reason(), "invalid-tool-version");
    assert!(
        !dir.path().join("installed.marker").exists(),
        "installer must not run for invalid versions"
    );
    assert_eq!(runner.call_count(), 0);
}

#[tokio::test]
async fn test_invalid_dependency_version_aborts_before_install() {
    let (dir, config) = workspace_with_installer("touch installed.marker");
    let runner = FakeRunner::passing();

    let err = CompatPipeline::run("5.88.0", "bad dependency string", &config, &runner)
        .await
        .expect_err("should fail");

    assert_eq!(err.reason(), "invalid-dependency-version");
    assert!(!dir.path().join("installed.marker").exists());
}

#[tokio::test]
async fn test_successful_run_reports_all_examples() {
    let (dir, config) = workspace_with_installer(happy_install());
    add_examples(dir.path(), &["alpha", "beta"]);
    let runner = FakeRunner::passing();

    let report = CompatPipeline::run("5.88.0", "css-loader@6.8.1", &config, &runner)
        .await
        .expect("run should succeed");

    assert!(report.success());
    assert_eq!(report.examples.len(), 2);
    assert_eq!(report.passed_count(), 2);
    let names: Vec<_> = report
        .examples
        .iter()
        .map(|e| e.display_name().to_string())
        .collect();
    assert_eq!(names, ["alpha", "beta"]);
    assert_eq!(runner.call_count(), 2);

    // Install mutated the manifest; the run must have put it back.
    assert_eq!(manifest_bytes(dir.path()), MANIFEST);
}

#[tokio::test]
async fn test_partial_failure_reports_full_ordered_matrix() {
    let (dir, config) = workspace_with_installer(happy_install());
    add_examples(dir.path(), &["a", "b", "c"]);
    // Discovery order is sorted, so index 1 is "b".
    let runner = FakeRunner::failing_on(&[1]);

    let err = CompatPipeline::run("5.88.0", "css-loader@6.8.1", &config, &runner)
        .await
        .expect_err("aggregate should fail");

    assert_eq!(err.reason(), "examples-failed");
    let RunError::ExamplesFailed { examples } = err else {
        panic!("unexpected error shape");
    };
    assert_eq!(examples.len(), 3, "failure payload carries every example");
    assert!(examples[0].passed());
    assert!(examples[1].failed());
    assert!(examples[2].passed(), "later examples still ran");
    assert_eq!(runner.call_count(), 3);
    assert_eq!(manifest_bytes(dir.path()), MANIFEST);
}

#[tokio::test]
async fn test_no_examples_found_never_reaches_execution() {
    let (dir, config) = workspace_with_installer(happy_install());
    // Install location exists but holds nothing runnable.
    std::fs::create_dir_all(dir.path().join("node_modules").join("css-loader"))
        .expect("create install location");
    let runner = FakeRunner::passing();

    let err = CompatPipeline::run("5.88.0", "css-loader@6.8.1", &config, &runner)
        .await
        .expect_err("should fail");

    assert_eq!(err.reason(), "no-examples-found");
    assert_eq!(runner.call_count(), 0);
    assert_eq!(manifest_bytes(dir.path()), MANIFEST);
}

#[tokio::test]
async fn test_installer_error_lines_fail_the_run() {
    let stub = concat!(
        "echo '{\"mutated\":true}' > package.json\n",
        "echo 'warning advisory' 1>&2\n",
        "echo 'error could not resolve peer' 1>&2\n",
        "echo 'webpack@5.88.0 css-loader@6.8.1'\n",
        "exit 0"
    );
    let (dir, config) = workspace_with_installer(stub);
    let runner = FakeRunner::passing();

    let err = CompatPipeline::run("5.88.0", "css-loader@6.8.1", &config, &runner)
        .await
        .expect_err("should fail");

    assert_eq!(err.reason(), "install-output-errors");
    let RunError::InstallOutputErrors { lines } = err else {
        panic!("unexpected error shape");
    };
    assert_eq!(lines, "error could not resolve peer");
    assert_eq!(runner.call_count(), 0);
    assert_eq!(manifest_bytes(dir.path()), MANIFEST);
}

#[tokio::test]
async fn test_missing_local_name_is_versions_not_installed() {
    let stub = concat!(
        "echo '{\"mutated\":true}' > package.json\n",
        "echo 'webpack@5.88.0 css-loader@6.9.9'\n",
        "exit 0"
    );
    let (dir, config) = workspace_with_installer(stub);
    let runner = FakeRunner::passing();

    let err = CompatPipeline::run("5.88.0", "css-loader@6.8.1", &config, &runner)
        .await
        .expect_err("should fail");

    assert_eq!(err.reason(), "versions-not-installed");
    assert_eq!(manifest_bytes(dir.path()), MANIFEST);
}

#[tokio::test]
async fn test_install_exec_failure_restores_manifest() {
    let (dir, config) = workspace_with_installer(concat!(
        "echo '{\"mutated\":true}' > package.json\n",
        "exit 12"
    ));
    let runner = FakeRunner::passing();

    let err = CompatPipeline::run("5.88.0", "css-loader@6.8.1", &config, &runner)
        .await
        .expect_err("should fail");

    assert_eq!(err.reason(), "install-exec-failed");
    assert_eq!(manifest_bytes(dir.path()), MANIFEST);
}

#[tokio::test]
async fn test_peer_install_pass_runs_when_dependency_has_manifest() {
    // The stub logs every invocation's arguments so the test can assert the
    // peer pass happened with the scoped arguments.
    let stub = concat!(
        "echo \"$@\" >> \"$PM_LOG\"\n",
        "echo 'webpack@5.88.0 css-loader@6.8.1'\n",
        "exit 0"
    );
    let (dir, mut config) = workspace_with_installer(stub);
    let log_path = dir.path().join("pm.log");
    config
        .install_env
        .push(("PM_LOG".to_string(), log_path.to_string_lossy().to_string()));

    let install_location = dir.path().join("node_modules").join("css-loader");
    add_examples(dir.path(), &["basic"]);
    std::fs::write(install_location.join("package.json"), b"{}").expect("dependency manifest");

    let runner = FakeRunner::passing();
    CompatPipeline::run("5.88.0", "css-loader@6.8.1", &config, &runner)
        .await
        .expect("run should succeed");

    let log = std::fs::read_to_string(&log_path).expect("read pm log");
    let invocations: Vec<_> = log.lines().collect();
    assert_eq!(invocations.len(), 2, "install + peer pass");
    assert!(invocations[0].starts_with("add --no-lockfile"));
    assert_eq!(invocations[1], "install --peer");
}
