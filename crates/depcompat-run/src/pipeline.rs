//! Compatibility-run orchestration.
//!
//! The top-level driver: validate both version strings, install, discover,
//! run every example sequentially, aggregate, and always restore the
//! manifest before handing the result back.

use depcompat_core::{CompatReport, Example, InstallSpec, Result, RunConfig, RunError};
use std::time::Instant;
use tracing::{debug, error, info};

use crate::discover::discover_examples;
use crate::execute::ExampleRunner;
use crate::install::install;
use crate::manifest::ManifestGuard;
use crate::resolve::{resolve_dependency, resolve_tool};

/// Compatibility pipeline orchestrator.
pub struct CompatPipeline;

impl CompatPipeline {
    /// Run a full compatibility check and resolve exactly once.
    ///
    /// Per-example failures are attached to their example and do not stop
    /// the remaining examples; they escalate to an aggregate
    /// `examples-failed` only after every example has been attempted.
    /// Validation and installation failures are fatal immediately. The
    /// manifest is restored on every path past resolution.
    pub async fn run(
        tool_version: &str,
        dependency_version: &str,
        config: &RunConfig,
        runner: &dyn ExampleRunner,
    ) -> Result<CompatReport> {
        let start = Instant::now();
        debug!(
            "to re-run: depcompat run --tool {} --dependency {}",
            tool_version, dependency_version
        );

        let tool =
            resolve_tool(tool_version, config).ok_or_else(|| RunError::InvalidToolVersion {
                version: tool_version.to_string(),
            })?;

        let dependency =
            resolve_dependency(dependency_version).ok_or_else(|| {
                RunError::InvalidDependencyVersion {
                    version: dependency_version.to_string(),
                }
            })?;

        // Installation mutates the manifest; from here on the run owes a
        // restoration on every exit path.
        let mut guard = ManifestGuard::acquire(config.manifest_path()).map_err(|e| {
            RunError::InstallExecFailed {
                detail: format!("failed to snapshot manifest: {}", e),
            }
        })?;

        let outcome = Self::run_installed(&tool, &dependency, config, runner).await;
        guard.restore();

        let duration_ms = start.elapsed().as_millis() as u64;
        let examples = outcome?;

        if examples.iter().any(Example::failed) {
            return Err(RunError::ExamplesFailed { examples });
        }

        let report = CompatReport::new(tool, dependency, examples, duration_ms);
        info!(
            run_id = %report.run_id,
            passed = report.passed_count(),
            "compatibility run passed"
        );
        Ok(report)
    }

    /// Everything between manifest acquisition and restoration.
    async fn run_installed(
        tool: &InstallSpec,
        dependency: &InstallSpec,
        config: &RunConfig,
        runner: &dyn ExampleRunner,
    ) -> Result<Vec<Example>> {
        info!(tool = %tool, dependency = %dependency, "installing pinned versions");
        let install_start = Instant::now();
        install(tool, dependency, config).await?;
        debug!(duration_ms = install_start.elapsed().as_millis() as u64, "finished install");

        info!(dependency = %dependency.name, "retrieving dependency examples");
        let examples = discover_examples(dependency, config)?;
        if examples.is_empty() {
            return Err(RunError::NoExamplesFound);
        }

        info!(
            count = examples.len(),
            "running {} with {}", dependency, tool
        );

        // Strictly sequential fold: examples share the installed modules
        // tree, and the report's ordering matches discovery order.
        let mut outcomes = Vec::with_capacity(examples.len());
        for (index, mut example) in examples.into_iter().enumerate() {
            example.ensure_name(index);
            info!(example = example.display_name(), "running example");

            let example_start = Instant::now();
            if let Err(err) = runner.execute(&example.config).await {
                error!(
                    example = example.display_name(),
                    reason = err.reason(),
                    "example failed: {}",
                    err
                );
                example.error = Some(err);
            }
            debug!(
                example = example.display_name(),
                duration_ms = example_start.elapsed().as_millis() as u64,
                "finished example"
            );

            outcomes.push(example);
        }

        Ok(outcomes)
    }
}
