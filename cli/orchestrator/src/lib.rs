// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
//! Command-line surface of thaterror: argument definitions and the
//! subcommand drivers behind the `thaterror` binary.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use config::Config;
use path::FileFilter;
use pipeline::GenerationContext;
use thiserror::Error;
use tracing::info;

/// Errors that can occur during thaterror operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    /// Generation failed.
    #[error(transparent)]
    Pipeline(#[from] pipeline::PipelineError),
    /// Lint failed or found a violation.
    #[error(transparent)]
    Lint(#[from] analysis::LintError),
    /// A glob pattern was rejected.
    #[error(transparent)]
    Path(#[from] path::PathError),
}

/// Result type alias for thaterror operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Generate error trait implementations from doc-comment annotations and lint
/// for untyped error returns.
#[derive(Parser, Debug)]
#[command(name = "thaterror", version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
    /// Configuration file (defaults to `thaterror.toml` in the root, if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Available thaterror commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate `Display`, `Error` and wrapping code for annotated types
    Generate {
        /// Project root
        #[arg(long)]
        path: Option<PathBuf>,
        /// Glob selecting annotated files, relative to the root
        #[arg(long)]
        filter: Option<String>,
        /// File name of the generated module
        #[arg(short, long)]
        output: Option<String>,
        /// Crate source directory, relative to the root
        #[arg(long)]
        src_dir: Option<PathBuf>,
        /// Run rustfmt over generated files
        #[arg(long)]
        rustfmt: bool,
    },
    /// Reject functions returning untyped errors
    Lint {
        /// Root to lint
        #[arg(long)]
        path: Option<PathBuf>,
        /// Glob selecting files to lint, relative to the root
        #[arg(long)]
        filter: Option<String>,
        /// Glob excluded from linting (repeatable)
        #[arg(long)]
        skip: Vec<String>,
    },
    /// Print the annotated types found under the root as JSON
    Specs {
        /// Project root
        #[arg(long)]
        path: Option<PathBuf>,
        /// Glob selecting annotated files, relative to the root
        #[arg(long)]
        filter: Option<String>,
        /// Crate source directory, relative to the root
        #[arg(long)]
        src_dir: Option<PathBuf>,
    },
}

impl Cli {
    /// Directory searched for the default configuration file.
    pub fn config_root(&self) -> PathBuf {
        let path = match &self.command {
            Commands::Generate { path, .. } | Commands::Lint { path, .. } | Commands::Specs { path, .. } => {
                path.clone()
            }
        };
        path.unwrap_or_else(|| PathBuf::from("."))
    }

    /// Load the configuration for this invocation.
    pub fn load_config(&self) -> Result<Config> {
        Ok(Config::load(self.config.as_deref(), &self.config_root())?)
    }
}

/// Run the selected subcommand.
pub fn run(cli: &Cli, config: &Config) -> Result<()> {
    match &cli.command {
        Commands::Generate { path, filter, output, src_dir, rustfmt } => {
            let generate = &config.generate;
            let ctx = GenerationContext::builder()
                .root(root_or(path, &generate.path))
                .filter(filter.clone().unwrap_or_else(|| generate.filter.clone()))
                .output_file_name(output.clone().unwrap_or_else(|| generate.output.clone()))
                .src_dir(src_dir.clone().unwrap_or_else(|| generate.src_dir.clone()))
                .rustfmt(*rustfmt || generate.rustfmt)
                .build()?;

            let report = pipeline::generate(&ctx)?;
            if !report.written.is_empty() {
                info!(
                    files = report.written.len(),
                    "declare `mod {};` next to each annotated file",
                    ctx.output_module()
                );
            }
            Ok(())
        }
        Commands::Lint { path, filter, skip } => {
            let lint = &config.lint;
            let root = root_or(path, &lint.path);
            let skip = if skip.is_empty() { &lint.skip } else { skip };
            let filter = FileFilter::new(filter.as_deref().unwrap_or(&lint.filter), skip)?;

            let report = analysis::lint(&root, &filter)?;
            info!(
                packages = report.packages,
                files = report.files,
                functions = report.functions,
                "lint passed"
            );
            Ok(())
        }
        Commands::Specs { path, filter, src_dir } => {
            let generate = &config.generate;
            let ctx = GenerationContext::builder()
                .root(root_or(path, &generate.path))
                .filter(filter.clone().unwrap_or_else(|| generate.filter.clone()))
                .output_file_name(generate.output.clone())
                .src_dir(src_dir.clone().unwrap_or_else(|| generate.src_dir.clone()))
                .build()?;

            let specs = pipeline::collect_specs(&ctx)?;
            println!("{}", pipeline::specs_to_json(&specs)?);
            Ok(())
        }
    }
}

fn root_or(flag: &Option<PathBuf>, configured: &Option<PathBuf>) -> PathBuf {
    flag.as_deref().or(configured.as_deref()).map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."))
}
