//! depcompat Core - Domain model for compatibility runs
//!
//! Defines the entities shared across the pipeline:
//! - InstallSpec: a resolved, installable package reference
//! - Example: one runnable configuration shipped with the dependency
//! - CompatReport: the ordered per-example outcome matrix
//! - RunError: the single tagged failure type used on every path
//! - RunConfig: immutable configuration built once at startup

pub mod config;
pub mod error;
pub mod example;
pub mod report;
pub mod spec;
pub mod telemetry;

pub use config::{Replacement, RunConfig};
pub use error::{Result, RunError};
pub use example::{Example, ExampleConfig};
pub use report::CompatReport;
pub use spec::{InstallSpec, VersionSource};
pub use telemetry::init_tracing;

/// depcompat domain version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
