//! Version string resolution.
//!
//! Turns the human-readable version strings given on the command line into
//! installable [`InstallSpec`] references. Resolution either succeeds
//! completely or yields `None`; no partially-filled specs exist.

use depcompat_core::{InstallSpec, RunConfig, VersionSource};

/// Resolve the build tool's version string.
///
/// Accepts a registry version (`5.88.0`, `next`), an explicit
/// `name@version` where the name matches the configured tool, or a git
/// reference (`owner/repo#branch`) whose repository name matches the
/// configured tool.
pub fn resolve_tool(version: &str, config: &RunConfig) -> Option<InstallSpec> {
    let version = version.trim();
    if version.is_empty() {
        return None;
    }

    if version.contains('/') {
        let (repository, reference) = split_git_reference(version)?;
        let repo_name = repository.rsplit('/').next()?;
        if repo_name != config.tool_name {
            return None;
        }
        return Some(InstallSpec::new(
            config.tool_name.clone(),
            VersionSource::Git {
                repository: repository.to_string(),
                reference: reference.to_string(),
            },
        ));
    }

    if let Some((name, pinned)) = version.split_once('@') {
        if name != config.tool_name || !is_valid_version(pinned) {
            return None;
        }
        return Some(InstallSpec::new(
            config.tool_name.clone(),
            VersionSource::Registry {
                version: pinned.to_string(),
            },
        ));
    }

    if !is_valid_version(version) {
        return None;
    }

    Some(InstallSpec::new(
        config.tool_name.clone(),
        VersionSource::Registry {
            version: version.to_string(),
        },
    ))
}

/// Resolve the dependency's version string.
///
/// Accepts `name@version`, a scoped `@scope/name@version`, a bare package
/// name (pinned to the `latest` dist-tag), or a git reference
/// (`owner/repo#branch`).
pub fn resolve_dependency(version: &str) -> Option<InstallSpec> {
    let version = version.trim();
    if version.is_empty() {
        return None;
    }

    // Scoped packages start with '@'; the version separator is the last '@'.
    if let Some(rest) = version.strip_prefix('@') {
        let (name_rest, pinned) = rest.rsplit_once('@')?;
        let name = format!("@{}", name_rest);
        if !is_valid_scoped_name(&name) || !is_valid_version(pinned) {
            return None;
        }
        return Some(InstallSpec::new(
            name,
            VersionSource::Registry {
                version: pinned.to_string(),
            },
        ));
    }

    if version.contains('/') {
        let (repository, reference) = split_git_reference(version)?;
        let name = repository.rsplit('/').next()?;
        if !is_valid_name(name) {
            return None;
        }
        return Some(InstallSpec::new(
            name.to_string(),
            VersionSource::Git {
                repository: repository.to_string(),
                reference: reference.to_string(),
            },
        ));
    }

    if let Some((name, pinned)) = version.split_once('@') {
        if !is_valid_name(name) || !is_valid_version(pinned) {
            return None;
        }
        return Some(InstallSpec::new(
            name.to_string(),
            VersionSource::Registry {
                version: pinned.to_string(),
            },
        ));
    }

    // Bare name: pin to the latest dist-tag.
    if !is_valid_name(version) {
        return None;
    }
    Some(InstallSpec::new(
        version.to_string(),
        VersionSource::Registry {
            version: "latest".to_string(),
        },
    ))
}

/// Split `owner/repo[#ref]` into repository and reference (default `main`).
fn split_git_reference(input: &str) -> Option<(&str, &str)> {
    let (repository, reference) = match input.split_once('#') {
        Some((repository, reference)) => (repository, reference),
        None => (input, "main"),
    };

    let mut segments = repository.split('/');
    let owner = segments.next()?;
    let repo = segments.next()?;
    if segments.next().is_some()
        || owner.is_empty()
        || repo.is_empty()
        || reference.is_empty()
        || !is_valid_name(owner)
        || !is_valid_name(repo)
        || !is_valid_reference(reference)
    {
        return None;
    }

    Some((repository, reference))
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

fn is_valid_scoped_name(name: &str) -> bool {
    match name.strip_prefix('@') {
        Some(rest) => match rest.split_once('/') {
            Some((scope, pkg)) => is_valid_name(scope) && is_valid_name(pkg),
            None => false,
        },
        None => false,
    }
}

fn is_valid_version(version: &str) -> bool {
    !version.is_empty()
        && version
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+' | '^' | '~' | '*'))
}

fn is_valid_reference(reference: &str) -> bool {
    !reference.is_empty()
        && reference
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/'))
}
