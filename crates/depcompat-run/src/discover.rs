//! Example discovery.
//!
//! Looks inside the dependency's install location for runnable examples:
//! first the conventional example directories, then commands lifted from
//! the README's first fenced code block as a fallback.

use depcompat_core::{Example, ExampleConfig, InstallSpec, Result, RunConfig, RunError};
use std::path::Path;
use tracing::debug;

/// Discover the dependency's runnable examples, in a stable order.
///
/// Returns an empty vector when nothing runnable exists; deciding whether
/// that is fatal belongs to the orchestrator.
pub fn discover_examples(dependency: &InstallSpec, config: &RunConfig) -> Result<Vec<Example>> {
    let install_location = config.install_location(dependency);

    for dir_name in &config.example_dirs {
        let dir = install_location.join(dir_name);
        if !dir.is_dir() {
            continue;
        }

        let examples = examples_in_directory(&dir, config)?;
        if !examples.is_empty() {
            debug!(
                directory = %dir.display(),
                count = examples.len(),
                "found example configurations"
            );
            return Ok(examples);
        }
    }

    // No example directories: fall back to commands documented in the README.
    let readme = install_location.join("README.md");
    if readme.is_file() {
        let content = std::fs::read_to_string(&readme).map_err(|e| RunError::DiscoveryFailed {
            detail: format!("failed to read {}: {}", readme.display(), e),
        })?;
        let examples = examples_from_readme(&content, &install_location, config);
        if !examples.is_empty() {
            debug!(count = examples.len(), "extracted example commands from README");
        }
        return Ok(examples);
    }

    Ok(Vec::new())
}

/// Examples inside one example directory: each subdirectory holding a tool
/// config file is an example named after the subdirectory; a tool config at
/// the directory root is a single unnamed example.
fn examples_in_directory(dir: &Path, config: &RunConfig) -> Result<Vec<Example>> {
    let mut subdirs = Vec::new();
    let entries = std::fs::read_dir(dir).map_err(|e| RunError::DiscoveryFailed {
        detail: format!("failed to read {}: {}", dir.display(), e),
    })?;
    for entry in entries {
        let entry = entry.map_err(|e| RunError::DiscoveryFailed {
            detail: e.to_string(),
        })?;
        let path = entry.path();
        if path.is_dir() && path.join(&config.tool_config_file).is_file() {
            subdirs.push(path);
        }
    }

    // Directory iteration order is filesystem-dependent; sort for a stable
    // discovery order.
    subdirs.sort();

    let mut examples: Vec<Example> = subdirs
        .into_iter()
        .map(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string());
            Example::new(
                name,
                ExampleConfig::ConfigFile {
                    path: path.join(&config.tool_config_file),
                },
            )
        })
        .collect();

    if examples.is_empty() {
        let root_config = dir.join(&config.tool_config_file);
        if root_config.is_file() {
            examples.push(Example::new(
                None,
                ExampleConfig::ConfigFile { path: root_config },
            ));
        }
    }

    Ok(examples)
}

/// Commands from the README's first fenced code block, one example per
/// runnable line, with the configured rewrites applied.
fn examples_from_readme(content: &str, cwd: &Path, config: &RunConfig) -> Vec<Example> {
    let Some(block) = first_fenced_block(content) else {
        return Vec::new();
    };

    block
        .lines()
        .map(|line| line.trim())
        .map(|line| line.strip_prefix("$ ").unwrap_or(line))
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            let mut command = line.to_string();
            for rule in &config.command_replacements {
                command = command.replace(&rule.replaceable, &rule.replacement);
            }
            Example::new(
                None,
                ExampleConfig::Command {
                    command,
                    cwd: cwd.to_path_buf(),
                },
            )
        })
        .collect()
}

/// Contents of the first ``` fenced code block, language tag stripped.
fn first_fenced_block(content: &str) -> Option<&str> {
    let start = content.find("```")?;
    let after_fence = &content[start + 3..];
    let body_start = after_fence.find('\n')? + 1;
    let body = &after_fence[body_start..];
    let end = body.find("```")?;
    Some(&body[..end])
}
