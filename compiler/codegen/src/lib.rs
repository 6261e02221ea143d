// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Code synthesis for annotated error types.
//!
//! This crate turns [`ErrorTypeSpec`]s into Rust items implementing
//! `Display` and `Error`. It focuses solely on producing source text: items
//! are handed to an [`ArtifactSink`], which decides how artifacts are buffered
//! and written. Discovery, buffering and file output live in the pipeline crate.

pub mod generators;

use std::path::{Path, PathBuf};
use std::process::Command;

use ir::{ErrorTypeSpec, Mode, UnionDescriptor};
use parser::template::{TemplateCompiler, TemplateError};
use path::{artifact_dir_for_module, module_path_for_dir, ArtifactKey, PathError};
use thiserror::Error;
use tracing::debug;

use crate::generators::error_impl::{emit_display_impl, emit_error_impl, emit_template_const};
use crate::generators::union::{
    emit_member_stub, emit_union_enum, emit_union_from, emit_wrap_accessors, union_members,
    UnionMember,
};

/// Error type for code generation operations in this crate.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Formatting error when building generated source.
    #[error(transparent)]
    Fmt(#[from] std::fmt::Error),
    /// Module path or artifact location could not be derived.
    #[error(transparent)]
    Path(#[from] PathError),
    /// The template compiler could not be built.
    #[error("template compiler: {0}")]
    Compiler(#[from] TemplateError),
    /// A message template is malformed.
    #[error("`{type_name}`: invalid message template: {source}")]
    Template {
        /// Owning type
        type_name: String,
        /// Underlying template error
        source: TemplateError,
    },
    /// A type names the same wrapped type twice.
    #[error("`{type_name}` wraps `{wrap_ref}` more than once")]
    DuplicateWrapRef {
        /// Owning type
        type_name: String,
        /// The repeated reference
        wrap_ref: String,
    },
    /// A wrapped type's module does not map to a source directory.
    #[error("`{type_name}` wraps a type from `{module}`, but {} does not exist", dir.display())]
    UnresolvedModule {
        /// Owning type
        type_name: String,
        /// Module path of the wrapped type
        module: String,
        /// Directory the module was expected in
        dir: PathBuf,
    },
    /// An artifact was opened without a package identity.
    #[error("artifact {key} has no package identity")]
    MissingPackage {
        /// Artifact directory
        key: String,
    },
    /// rustfmt could not format a generated file.
    #[error("rustfmt failed on {}: {message}", path.display())]
    Rustfmt {
        /// Generated file
        path: PathBuf,
        /// Failure description
        message: String,
    },
}

/// Convenient result type for codegen functions in this crate.
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Destination of generated items.
///
/// Implementors key buffers by artifact directory and open a buffer on first
/// use with the given package identity. Items must be kept in append order.
pub trait ArtifactSink {
    /// Append `item` to the artifact `key`, opening it as `package` if needed.
    ///
    /// Fails with [`CodegenError::MissingPackage`] when a new artifact would be
    /// opened with an empty `package`.
    fn append(&mut self, key: &ArtifactKey, package: &str, item: String) -> Result<()>;
}

/// Synthesizes the companion items of annotated types.
#[derive(Debug, Clone)]
pub struct Synthesizer {
    src_root: PathBuf,
    templates: TemplateCompiler,
}

impl Synthesizer {
    /// Create a synthesizer for the crate whose modules live under `src_root`.
    pub fn new(src_root: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self { src_root: src_root.into(), templates: TemplateCompiler::new()? })
    }

    /// Emit every item for `spec` into `sink`.
    ///
    /// Items land in the artifact of the declaring file's directory, except
    /// the stubs of crate-local wrapped types, which land in the artifact of
    /// the wrapped type's directory.
    pub fn synthesize<S>(&self, spec: &ErrorTypeSpec, sink: &mut S) -> Result<()>
    where
        S: ArtifactSink + ?Sized,
    {
        let owner_key = ArtifactKey::for_source(&spec.source_path);
        let owner_package = module_path_for_dir(&self.src_root, owner_key.dir())?;

        match &spec.mode {
            Mode::Template(template) => {
                let compiled = self.templates.compile(template).map_err(|source| {
                    CodegenError::Template { type_name: spec.type_path(), source }
                })?;
                sink.append(&owner_key, &owner_package, emit_template_const(spec, template)?)?;
                sink.append(&owner_key, &owner_package, emit_display_impl(spec, Some(&compiled))?)?;
            }
            Mode::Transparent => {
                sink.append(&owner_key, &owner_package, emit_display_impl(spec, None)?)?;
            }
        }

        if spec.is_wrapping() {
            let members = union_members(spec)?;
            let descriptor = UnionDescriptor::for_spec(spec);

            sink.append(&owner_key, &owner_package, emit_union_enum(spec, &descriptor, &members)?)?;
            for member in &members {
                sink.append(&owner_key, &owner_package, emit_union_from(&descriptor, member)?)?;
            }
            sink.append(&owner_key, &owner_package, emit_wrap_accessors(spec, &descriptor)?)?;

            for member in &members {
                let stub = emit_member_stub(spec, &descriptor, member)?;
                match self.member_artifact(spec, member)? {
                    Some((key, package)) => sink.append(&key, &package, stub)?,
                    None => sink.append(&owner_key, &owner_package, stub)?,
                }
            }
        }

        sink.append(&owner_key, &owner_package, emit_error_impl(spec)?)?;
        debug!(type_name = %spec.type_path(), artifact = %owner_key, "synthesized");
        Ok(())
    }

    /// Artifact owning the declaration of a wrapped type declared elsewhere
    /// in the crate, or `None` when the stub belongs with its owner.
    fn member_artifact(
        &self,
        spec: &ErrorTypeSpec,
        member: &UnionMember,
    ) -> Result<Option<(ArtifactKey, String)>> {
        let Some(origin) = member.wrap_ref.origin.as_deref() else { return Ok(None) };
        let Some(dir) = artifact_dir_for_module(&self.src_root, origin) else { return Ok(None) };

        if !dir.is_dir() {
            return Err(CodegenError::UnresolvedModule {
                type_name: spec.type_path(),
                module: origin.to_string(),
                dir,
            });
        }
        let package = module_path_for_dir(&self.src_root, &dir)?;
        Ok(Some((ArtifactKey::new(dir), package)))
    }
}

/// Formats a generated Rust source file in place with rustfmt.
pub fn format_with_rustfmt(path: &Path) -> Result<()> {
    let output = Command::new("rustfmt")
        .arg("--edition=2021")
        .arg(path)
        .output()
        .map_err(|e| CodegenError::Rustfmt { path: path.to_path_buf(), message: e.to_string() })?;

    if output.status.success() {
        Ok(())
    } else {
        Err(CodegenError::Rustfmt {
            path: path.to_path_buf(),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Trim trailing whitespace from each line and drop trailing blank lines.
/// Always ensures the returned string ends with a single newline when not empty.
pub fn clean_generated_source(src: &str) -> String {
    let mut lines: Vec<String> = src.lines().map(|l| l.trim_end().to_string()).collect();

    while matches!(lines.last(), Some(line) if line.is_empty()) {
        lines.pop();
    }

    if lines.is_empty() {
        String::new()
    } else {
        format!("{}\n", lines.join("\n"))
    }
}
