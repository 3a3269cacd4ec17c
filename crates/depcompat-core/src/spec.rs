//! Resolved package references for the tool and the dependency under test.

use serde::{Deserialize, Serialize};

/// Where a resolved package installs from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum VersionSource {
    /// A registry version or dist-tag, e.g. `5.88.0` or `next`.
    Registry { version: String },

    /// A git reference, e.g. `webpack/webpack` at `main`.
    Git { repository: String, reference: String },
}

/// A resolved, installable reference to a package at a pinned version.
///
/// Resolution either produces a complete spec or nothing; there is no
/// partially-filled state. `install_string` is what the package manager
/// accepts, `local_name` is what is checked against installer output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallSpec {
    /// Logical package name, e.g. `webpack` or `css-loader`.
    pub name: String,

    /// Pinned version source.
    pub source: VersionSource,
}

impl InstallSpec {
    /// Create a new spec. Callers guarantee `name` is non-empty.
    pub fn new(name: String, source: VersionSource) -> Self {
        Self { name, source }
    }

    /// The argument handed to the package manager's install command.
    pub fn install_string(&self) -> String {
        match &self.source {
            VersionSource::Registry { version } => format!("{}@{}", self.name, version),
            VersionSource::Git {
                repository,
                reference,
            } => format!("{}#{}", repository, reference),
        }
    }

    /// The canonical name expected in the installer's success output.
    ///
    /// Git installs resolve to a commit the package manager chooses, so
    /// only the package name can be verified for those.
    pub fn local_name(&self) -> String {
        match &self.source {
            VersionSource::Registry { version } => format!("{}@{}", self.name, version),
            VersionSource::Git { .. } => self.name.clone(),
        }
    }

    /// Directory name under the modules directory once installed.
    pub fn install_dir(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for InstallSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.install_string())
    }
}
