// SPDX-License-Identifier: Apache-2.0

//! thaterror umbrella crate.
//!
//! Re-exports the library surface of the workspace: the generation
//! pipeline, the untyped-error lint and the project configuration. The
//! `thaterror` binary lives in `cli/orchestrator`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

pub use analysis::{lint, LintError, LintReport, Violation};
pub use config::{Config, ConfigError};
pub use pipeline::{collect_specs, generate, GenerationContext, PipelineError};

/// Miscellaneous metadata about the thaterror workspace.
pub mod thaterror_meta {
    /// Version string for the umbrella crate, as reported by Cargo.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}
