//! Error types for compatibility runs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::example::Example;

/// A tagged failure from any stage of a compatibility run.
///
/// Every failure path constructs one of these, so callers have a single
/// shape to branch on. The serialized form carries the same stable reason
/// tag returned by [`RunError::reason`].
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum RunError {
    /// The tool version string did not resolve to an installable reference.
    #[error("tool version '{version}' is not valid")]
    InvalidToolVersion { version: String },

    /// The dependency version string did not resolve to an installable reference.
    #[error("dependency version '{version}' is not valid")]
    InvalidDependencyVersion { version: String },

    /// The install command could not be executed at all.
    #[error("install command could not be executed: {detail}")]
    InstallExecFailed { detail: String },

    /// The installer emitted non-warning diagnostics on its error channel.
    #[error("installer reported errors:\n{lines}")]
    InstallOutputErrors { lines: String },

    /// The installer's output does not confirm both pinned versions.
    #[error("expected versions not present in installer output")]
    VersionsNotInstalled { output: String },

    /// The scoped peer-install pass for the dependency failed.
    #[error("peer install for the dependency failed: {detail}")]
    PeerInstallFailed { detail: String },

    /// Example discovery could not read the dependency's install location.
    #[error("example discovery failed: {detail}")]
    DiscoveryFailed { detail: String },

    /// Discovery completed but produced no runnable examples.
    #[error("no runnable examples were found for the dependency")]
    NoExamplesFound,

    /// An example exited unsuccessfully. Attached to the example, not fatal.
    #[error("example exited unsuccessfully:\n{output}")]
    ExampleExecFailed { output: String },

    /// An example exceeded its time budget and was killed.
    #[error("example timed out after {timeout_secs}s")]
    ExampleTimedOut { timeout_secs: u64 },

    /// Aggregate failure carrying the full ordered example sequence,
    /// both passing and failing, so callers can present a matrix.
    #[error("{} of {} examples failed", failed_count(.examples), .examples.len())]
    ExamplesFailed { examples: Vec<Example> },
}

fn failed_count(examples: &[Example]) -> usize {
    examples.iter().filter(|e| e.failed()).count()
}

impl RunError {
    /// Machine-stable reason code for this failure.
    pub fn reason(&self) -> &'static str {
        match self {
            RunError::InvalidToolVersion { .. } => "invalid-tool-version",
            RunError::InvalidDependencyVersion { .. } => "invalid-dependency-version",
            RunError::InstallExecFailed { .. } => "install-exec-failed",
            RunError::InstallOutputErrors { .. } => "install-output-errors",
            RunError::VersionsNotInstalled { .. } => "versions-not-installed",
            RunError::PeerInstallFailed { .. } => "peer-install-failed",
            RunError::DiscoveryFailed { .. } => "discovery-failed",
            RunError::NoExamplesFound => "no-examples-found",
            RunError::ExampleExecFailed { .. } => "example-exec-failed",
            RunError::ExampleTimedOut { .. } => "example-timed-out",
            RunError::ExamplesFailed { .. } => "examples-failed",
        }
    }

    /// Whether this error is attached to a single example rather than
    /// terminating the whole run.
    pub fn is_example_scoped(&self) -> bool {
        matches!(
            self,
            RunError::ExampleExecFailed { .. } | RunError::ExampleTimedOut { .. }
        )
    }
}

/// Result type for compatibility run operations
pub type Result<T> = std::result::Result<T, RunError>;
