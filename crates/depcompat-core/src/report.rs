//! Aggregate compatibility report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::example::Example;
use crate::spec::InstallSpec;

/// Result of a complete compatibility run.
///
/// Holds the ordered sequence of examples with their final outcomes.
/// The order always matches discovery order; the length always equals
/// the number of discovered examples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatReport {
    /// Unique id for this run.
    pub run_id: Uuid,

    /// The build tool that was installed.
    pub tool: InstallSpec,

    /// The dependency that was tested.
    pub dependency: InstallSpec,

    /// When the run completed.
    pub run_at: DateTime<Utc>,

    /// Total duration in milliseconds.
    pub duration_ms: u64,

    /// Per-example outcomes in discovery order.
    pub examples: Vec<Example>,
}

impl CompatReport {
    /// Build a report from the run's final example sequence.
    pub fn new(
        tool: InstallSpec,
        dependency: InstallSpec,
        examples: Vec<Example>,
        duration_ms: u64,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            tool,
            dependency,
            run_at: Utc::now(),
            duration_ms,
            examples,
        }
    }

    /// Number of examples that passed.
    pub fn passed_count(&self) -> usize {
        self.examples.iter().filter(|e| e.passed()).count()
    }

    /// Number of examples that failed.
    pub fn failed_count(&self) -> usize {
        self.examples.iter().filter(|e| e.failed()).count()
    }

    /// Whether every example passed.
    pub fn success(&self) -> bool {
        self.failed_count() == 0
    }
}
