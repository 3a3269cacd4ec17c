//! Run configuration.
//!
//! One immutable value constructed at startup and passed by reference into
//! the pipeline; nothing reads ambient process-wide state.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::spec::InstallSpec;

/// A substring rewrite applied to commands lifted from documentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    /// Substring to look for.
    pub replaceable: String,

    /// What to substitute it with.
    pub replacement: String,
}

/// Immutable configuration for a compatibility run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Logical package name of the build tool, e.g. `webpack`.
    pub tool_name: String,

    /// Package manager binary used for installs.
    pub package_manager: String,

    /// Arguments for the pinned install invocation, before the install strings.
    pub install_args: Vec<String>,

    /// Arguments for the scoped peers-only install pass.
    pub peer_install_args: Vec<String>,

    /// Environment injected into installer invocations (non-interactive/CI mode).
    pub install_env: Vec<(String, String)>,

    /// Working directory containing the manifest.
    pub workdir: PathBuf,

    /// Modules directory, relative to `workdir`.
    pub modules_dir: PathBuf,

    /// Manifest filename mutated by pinned installs.
    pub manifest_file: String,

    /// Directory names checked for examples, in priority order.
    pub example_dirs: Vec<String>,

    /// Tool config filename that marks a directory as a runnable example.
    pub tool_config_file: String,

    /// Path to the tool's executable script, relative to `workdir`.
    pub tool_bin: PathBuf,

    /// Rewrites applied to commands extracted from documentation.
    pub command_replacements: Vec<Replacement>,

    /// Environment injected into example executions (headless operation).
    pub example_env: Vec<(String, String)>,

    /// Per-example time budget in seconds before forced termination.
    pub example_timeout_secs: u64,
}

impl RunConfig {
    /// Production configuration rooted at the given working directory.
    pub fn for_workdir(workdir: PathBuf) -> Self {
        Self {
            workdir,
            ..Self::default()
        }
    }

    /// Absolute-or-relative path to the manifest file.
    pub fn manifest_path(&self) -> PathBuf {
        self.workdir.join(&self.manifest_file)
    }

    /// Path to the modules directory.
    pub fn modules_path(&self) -> PathBuf {
        self.workdir.join(&self.modules_dir)
    }

    /// Install location of a package inside the modules directory.
    pub fn install_location(&self, spec: &InstallSpec) -> PathBuf {
        self.modules_path().join(spec.install_dir())
    }

    /// Path to the tool's executable script.
    pub fn tool_bin_path(&self) -> PathBuf {
        self.workdir.join(&self.tool_bin)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tool_name: "webpack".to_string(),
            package_manager: "yarn".to_string(),
            install_args: vec!["add".to_string(), "--no-lockfile".to_string()],
            peer_install_args: vec!["install".to_string(), "--peer".to_string()],
            install_env: vec![("TRAVIS".to_string(), "true".to_string())],
            workdir: PathBuf::from("."),
            modules_dir: PathBuf::from("node_modules"),
            manifest_file: "package.json".to_string(),
            example_dirs: vec!["examples".to_string(), "example".to_string()],
            tool_config_file: "webpack.config.js".to_string(),
            tool_bin: Path::new("node_modules")
                .join("webpack")
                .join("bin")
                .join("webpack.js"),
            command_replacements: vec![
                Replacement {
                    replaceable: "node ".to_string(),
                    replacement: "node --no-warnings ".to_string(),
                },
                Replacement {
                    replaceable: "<insert local ip>".to_string(),
                    replacement: "127.0.0.1".to_string(),
                },
            ],
            example_env: vec![("QT_QPA_PLATFORM".to_string(), "offscreen".to_string())],
            example_timeout_secs: 300,
        }
    }
}
