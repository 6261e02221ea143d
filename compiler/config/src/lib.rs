// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! thaterror Configuration
//!
//! This crate provides the optional `thaterror.toml` project file. It holds:
//! - Generation settings (root, filter glob, output file name, source dir)
//! - Lint settings (file glob and skip globs)
//! - Logging configuration
//!
//! Every section and key is optional; missing values fall back to the same
//! defaults the command line uses. Command-line flags override file values.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Name of the configuration file looked up in the project root.
pub const DEFAULT_CONFIG_FILE: &str = "thaterror.toml";

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    /// Failed to parse the TOML configuration file
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// An explicitly requested configuration file does not exist
    #[error("Config file not found at: {}", .0.display())]
    NotFound(PathBuf),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `thaterror generate` settings
    pub generate: GenerateConfig,
    /// `thaterror lint` settings
    pub lint: LintConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Code generation configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Project root to scan (defaults to the working directory)
    pub path: Option<PathBuf>,
    /// Glob selecting annotated files, relative to the root
    pub filter: String,
    /// File name of the generated module written into each directory
    pub output: String,
    /// Crate source directory, relative to the root
    pub src_dir: PathBuf,
    /// Run rustfmt over generated files
    pub rustfmt: bool,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            path: None,
            filter: "**/error.rs".to_string(),
            output: "zz_generated_thaterror.rs".to_string(),
            src_dir: PathBuf::from("src"),
            rustfmt: false,
        }
    }
}

/// Lint configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Root to lint (defaults to the working directory)
    pub path: Option<PathBuf>,
    /// Glob selecting the files to lint, relative to the root
    pub filter: String,
    /// Globs excluded from linting
    pub skip: Vec<String>,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            path: None,
            filter: "**/*.rs".to_string(),
            skip: vec!["**/zz_generated_*.rs".to_string()],
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self { Self { level: "info".to_string() } }
}

impl Config {
    /// Load configuration from a TOML file at `path`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Returns the default config file path: `{root}/thaterror.toml`
    pub fn default_path(root: &Path) -> PathBuf { root.join(DEFAULT_CONFIG_FILE) }

    /// Load the configuration for a run.
    ///
    /// An explicit path must exist. Without one, `{root}/thaterror.toml` is
    /// read when present and defaults are used otherwise.
    pub fn load(explicit: Option<&Path>, root: &Path) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) if !path.is_file() => Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Self::from_file(path),
            None => {
                let path = Self::default_path(root);
                if path.is_file() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
