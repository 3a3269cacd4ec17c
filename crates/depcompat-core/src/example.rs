//! Discovered examples and their execution configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::RunError;

/// How a discovered example is executed.
///
/// Opaque to everything except the execution runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExampleConfig {
    /// A tool configuration file; run as `<tool> --config <path>`.
    ConfigFile { path: PathBuf },

    /// A command line lifted from the dependency's documentation.
    Command { command: String, cwd: PathBuf },
}

/// One runnable configuration belonging to the dependency.
///
/// Created by discovery, owned by the orchestrator for the duration of a
/// run. The only mutations are positional name defaulting and attaching
/// the execution failure, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    /// Display name. `None` until defaulted from discovery position.
    pub name: Option<String>,

    /// Execution configuration consumed by the runner.
    pub config: ExampleConfig,

    /// Captured execution failure, attached after the example ran.
    pub error: Option<RunError>,
}

impl Example {
    /// Create a freshly discovered example with no outcome yet.
    pub fn new(name: Option<String>, config: ExampleConfig) -> Self {
        Self {
            name,
            config,
            error: None,
        }
    }

    /// Default the display name from the example's position (1-based)
    /// when discovery did not provide one.
    pub fn ensure_name(&mut self, index: usize) {
        if self.name.is_none() {
            self.name = Some(format!("example {}", index + 1));
        }
    }

    /// Display name for logs and reports.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed example")
    }

    /// Whether the example ran without a captured failure.
    pub fn passed(&self) -> bool {
        self.error.is_none()
    }

    /// Whether the example carries a captured failure.
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}
