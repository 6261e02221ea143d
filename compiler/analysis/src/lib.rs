// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! thaterror Analysis
//!
//! This crate provides the linter that keeps a codebase on typed errors: no
//! function may return an untyped error contract (`Box<dyn Error>`,
//! `anyhow::Result`, ...). Functions and whole files can opt out with a
//! `+thaterror:ignore` doc comment line.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub mod lint;
pub mod untyped;

pub use lint::{lint, lint_source, LintReport};

/// A function returning an untyped error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Function or method name
    pub function: String,
    /// File declaring the function
    pub path: PathBuf,
    /// Line of the function name
    pub line: usize,
    /// Column of the function name
    pub column: usize,
    /// The untyped error found in the return type
    pub untyped: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` at {}:{}:{} shouldn't return an untyped error (`{}`)",
            self.function,
            self.path.display(),
            self.line,
            self.column,
            self.untyped
        )
    }
}

/// Errors raised by the linter.
#[derive(Debug, Error)]
pub enum LintError {
    /// A function returns an untyped error.
    #[error("{0}")]
    Violation(Violation),
    /// A source file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// Source file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
    /// A source file is not valid Rust.
    #[error("{}:{line}:{column}: {source}", path.display())]
    Syntax {
        /// Source file
        path: PathBuf,
        /// Line of the syntax error
        line: usize,
        /// Column of the syntax error
        column: usize,
        /// Underlying parser error
        source: syn::Error,
    },
    /// Discovery failed.
    #[error(transparent)]
    Path(#[from] path::PathError),
}

/// Result type for lint operations.
pub type Result<T> = std::result::Result<T, LintError>;
