//! Pinned installation of the tool and the dependency.
//!
//! One package-manager invocation installs both specs; its output is
//! classified rather than trusted. Package managers routinely emit advisory
//! warnings on stderr that must not fail the run, while real errors must,
//! and an exit code of 0 does not prove the requested versions were the
//! ones installed.

use depcompat_core::{InstallSpec, Result, RunConfig, RunError};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// Install both specs at their pinned versions.
///
/// Fails with:
/// - `install-exec-failed` when the invocation itself cannot run
/// - `install-output-errors` when stderr carries non-warning diagnostics
/// - `versions-not-installed` when stdout does not confirm both pins
/// - `peer-install-failed` when the dependency's own peer pass fails
pub async fn install(
    tool: &InstallSpec,
    dependency: &InstallSpec,
    config: &RunConfig,
) -> Result<()> {
    let mut args = config.install_args.clone();
    args.push(tool.install_string());
    args.push(dependency.install_string());

    debug!(
        command = format!("{} {}", config.package_manager, args.join(" ")),
        "running install command"
    );

    let output = run_package_manager(config, &args, &config.workdir)
        .await
        .map_err(|e| RunError::InstallExecFailed {
            detail: e.to_string(),
        })?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    let errors = error_lines(&stderr);
    if !errors.is_empty() {
        return Err(RunError::InstallOutputErrors {
            lines: errors.join("\n"),
        });
    }

    if !output.status.success() {
        // Non-zero exit with nothing usable on stderr.
        return Err(RunError::InstallExecFailed {
            detail: format!(
                "installer exited with status {}",
                output.status.code().unwrap_or(-1)
            ),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.contains(&tool.local_name()) || !stdout.contains(&dependency.local_name()) {
        return Err(RunError::VersionsNotInstalled {
            output: stdout.to_string(),
        });
    }

    install_peers(dependency, config).await?;

    info!(tool = %tool, dependency = %dependency, "pinned versions installed");
    Ok(())
}

/// Run the dependency's own peers-only install pass, scoped to its install
/// location. Skipped silently when the dependency ships no manifest there.
async fn install_peers(dependency: &InstallSpec, config: &RunConfig) -> Result<()> {
    let install_location = config.install_location(dependency);
    if !install_location.join(&config.manifest_file).is_file() {
        debug!(dependency = %dependency.name, "no manifest at install location, skipping peer install");
        return Ok(());
    }

    debug!(dependency = %dependency.name, "installing declared peers");
    let output = run_package_manager(config, &config.peer_install_args, &install_location)
        .await
        .map_err(|e| RunError::PeerInstallFailed {
            detail: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(RunError::PeerInstallFailed {
            detail: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    Ok(())
}

async fn run_package_manager(
    config: &RunConfig,
    args: &[String],
    cwd: &Path,
) -> std::io::Result<std::process::Output> {
    let mut command = Command::new(&config.package_manager);
    command
        .args(args)
        .current_dir(cwd)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (key, value) in &config.install_env {
        command.env(key, value);
    }
    command.output().await
}

/// Disqualifying lines from installer stderr, in original order.
///
/// Lines beginning with the literal token `warning` are advisory and
/// discarded; blank lines are formatting artifacts, not diagnostics.
/// Everything else disqualifies the install.
pub fn error_lines(stderr: &str) -> Vec<&str> {
    stderr
        .trim()
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with("warning"))
        .collect()
}
