// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! High-level pipeline that generates error trait implementations for
//! annotated types.
//!
//! ## Module Organization
//!
//! - `generation_context` - Run configuration and its builder
//! - `orchestration` - Main pipeline entry points (`generate`, `collect_specs`)
//! - `render_session` - Per-run artifact buffers and the final flush

use std::path::PathBuf;

use thiserror::Error;

/// Convenient result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while running the codegen pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A source file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// Source file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
    /// Two annotated types with the same name feed one artifact.
    #[error("type `{type_name}` is declared more than once in {artifact}")]
    DuplicateTypeName {
        /// Repeated type name
        type_name: String,
        /// Artifact directory
        artifact: String,
    },
    /// Two wrapping types would add the same conversion method to one member.
    #[error("`{first}` and `{second}` both add `{member}::{method}`; rename one of them")]
    MarkerMethodCollision {
        /// Wrapped crate-local type
        member: String,
        /// Colliding method name
        method: String,
        /// Owner registered first
        first: String,
        /// Owner registered second
        second: String,
    },
    /// Error from path derivation or discovery.
    #[error(transparent)]
    Path(#[from] path::PathError),
    /// Error from the annotation parser.
    #[error(transparent)]
    Parse(#[from] parser::ParseError),
    /// Error propagated from the codegen crate.
    #[error(transparent)]
    Codegen(#[from] codegen::CodegenError),
    /// Error while writing artifacts.
    #[error(transparent)]
    Render(#[from] render_session::RenderError),
    /// JSON serialization error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

// Module declarations
pub mod generation_context;
pub mod orchestration;
pub mod render_session;

// Re-export public API from orchestration module
pub use generation_context::GenerationContext;
pub use orchestration::{collect_specs, generate, specs_to_json};
pub use render_session::{ArtifactBuffer, FlushReport, RenderError, RenderSession};
