//! depcompat - build-tool x dependency compatibility runner
//!
//! Installs a pinned build tool and a pinned dependency, runs the
//! dependency's shipped examples through the tool, and reports which
//! examples passed.
//!
//! ## Commands
//!
//! - `run`: execute one compatibility check and print the matrix

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use depcompat_core::{init_tracing, Example, RunConfig, RunError};
use depcompat_run::{CompatPipeline, ToolProcessRunner};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "depcompat")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build-tool x dependency compatibility runner", long_about = None)]
struct Cli {
    /// Log verbosity (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    loglevel: String,

    /// Emit the report (or failure) as JSON on stdout
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one compatibility check between a tool version and a dependency
    Run {
        /// Build tool version to install (e.g. 5.88.0 or webpack/webpack#main)
        #[arg(long)]
        tool: String,

        /// Dependency to test (e.g. css-loader@6.8.1)
        #[arg(long)]
        dependency: String,

        /// Working directory containing the manifest
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// Package name of the build tool
        #[arg(long, default_value = "webpack")]
        tool_name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = parse_level(&cli.loglevel)?;
    init_tracing(cli.json, level);

    match cli.command {
        Commands::Run {
            tool,
            dependency,
            dir,
            tool_name,
        } => cmd_run(&tool, &dependency, dir, tool_name, cli.json).await,
    }
}

async fn cmd_run(
    tool: &str,
    dependency: &str,
    dir: PathBuf,
    tool_name: String,
    json: bool,
) -> Result<()> {
    let config = RunConfig {
        tool_name,
        ..RunConfig::for_workdir(dir)
    };
    let runner = ToolProcessRunner::new(&config);

    match CompatPipeline::run(tool, dependency, &config, &runner).await {
        Ok(report) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_examples(&report.examples);
                println!(
                    "\n{} with {}: {} example(s) passed",
                    report.dependency,
                    report.tool,
                    report.passed_count()
                );
            }
            Ok(())
        }
        Err(RunError::ExamplesFailed { examples }) => {
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&RunError::ExamplesFailed {
                        examples: examples.clone()
                    })?
                );
            } else {
                print_examples(&examples);
            }
            let failed = examples.iter().filter(|e| e.failed()).count();
            bail!("{} of {} examples failed", failed, examples.len());
        }
        Err(err) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&err)?);
            }
            bail!("{} ({})", err, err.reason());
        }
    }
}

fn print_examples(examples: &[Example]) {
    for example in examples {
        match &example.error {
            None => println!(" - {} ... ok", example.display_name()),
            Some(err) => println!(" - {} ... FAILED: {}", example.display_name(), err),
        }
    }
}

fn parse_level(input: &str) -> Result<Level> {
    match input.to_ascii_lowercase().as_str() {
        "error" => Ok(Level::ERROR),
        "warn" => Ok(Level::WARN),
        "info" => Ok(Level::INFO),
        "debug" => Ok(Level::DEBUG),
        "trace" => Ok(Level::TRACE),
        other => bail!("unknown log level '{}'", other),
    }
}
