// SPDX-License-Identifier: Apache-2.0

//! Incremental multi-file render manager.
//!
//! A [`RenderSession`] buffers generated items per artifact directory for one
//! run. Buffers are opened lazily, appended to by every synthesis call and
//! written exactly once by [`RenderSession::flush`], which consumes the
//! session.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use codegen::{clean_generated_source, format_with_rustfmt, ArtifactSink, CodegenError};
use path::ArtifactKey;
use thiserror::Error;
use tracing::{info, warn};

/// Errors raised while writing artifacts.
#[derive(Debug, Error)]
pub enum RenderError {
    /// An artifact could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Output file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Items buffered for one output artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactBuffer {
    package: String,
    items: Vec<String>,
}

impl ArtifactBuffer {
    fn new(package: &str) -> Self { Self { package: package.to_string(), items: Vec::new() } }

    /// Module path the artifact belongs to.
    pub fn package(&self) -> &str { &self.package }

    /// Items in append order.
    pub fn items(&self) -> &[String] { &self.items }

    /// Append one item.
    pub fn push(&mut self, item: String) { self.items.push(item); }

    /// Full text of the artifact file.
    pub fn render(&self) -> String {
        let mut out = format!(
            "// @generated by thaterror from annotations in `{}`. Do not edit.\n\n",
            self.package
        );
        out.push_str(&self.items.join("\n"));
        clean_generated_source(&out)
    }
}

/// Outcome of a flush.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Files written, in key order.
    pub written: Vec<PathBuf>,
    /// Files that rustfmt failed to format.
    pub unformatted: Vec<PathBuf>,
}

/// Render state for one generation run.
#[derive(Debug)]
pub struct RenderSession {
    output_file_name: String,
    buffers: BTreeMap<ArtifactKey, ArtifactBuffer>,
}

impl RenderSession {
    /// Create an empty session writing files named `output_file_name`.
    pub fn new(output_file_name: impl Into<String>) -> Self {
        Self { output_file_name: output_file_name.into(), buffers: BTreeMap::new() }
    }

    /// The buffer for `key`, opened as `package` on first use.
    pub fn resolve(&mut self, key: &ArtifactKey, package: &str) -> codegen::Result<&mut ArtifactBuffer> {
        if !self.buffers.contains_key(key) && package.is_empty() {
            return Err(CodegenError::MissingPackage { key: key.to_string() });
        }
        Ok(self.buffers.entry(key.clone()).or_insert_with(|| ArtifactBuffer::new(package)))
    }

    /// Open artifacts in key order.
    pub fn artifacts(&self) -> impl Iterator<Item = (&ArtifactKey, &ArtifactBuffer)> {
        self.buffers.iter()
    }

    /// Whether no artifact has been opened.
    pub fn is_empty(&self) -> bool { self.buffers.is_empty() }

    /// Write every artifact, optionally formatting it with rustfmt.
    ///
    /// The first write failure aborts the flush; files already written stay.
    pub fn flush(self, rustfmt: bool) -> Result<FlushReport, RenderError> {
        let mut report = FlushReport::default();
        for (key, buffer) in self.buffers {
            let path = key.output_path(&self.output_file_name);
            info!(path = %path.display(), items = buffer.items.len(), "render file");

            fs::write(&path, buffer.render())
                .map_err(|source| RenderError::Write { path: path.clone(), source })?;

            if rustfmt {
                if let Err(e) = format_with_rustfmt(&path) {
                    warn!(error = %e, "leaving generated file unformatted");
                    report.unformatted.push(path.clone());
                }
            }
            report.written.push(path);
        }
        Ok(report)
    }
}

impl ArtifactSink for RenderSession {
    fn append(&mut self, key: &ArtifactKey, package: &str, item: String) -> codegen::Result<()> {
        self.resolve(key, package)?.push(item);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_opens_lazily_and_keeps_first_package() {
        let mut session = RenderSession::new("zz_generated_thaterror.rs");
        assert!(session.is_empty());

        let key = ArtifactKey::new("src/net");
        session.resolve(&key, "crate::net").expect("open").push("a".to_string());
        session.resolve(&key, "").expect("existing buffer").push("b".to_string());

        let (_, buffer) = session.artifacts().next().expect("one artifact");
        assert_eq!(buffer.package(), "crate::net");
        assert_eq!(buffer.items(), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_missing_package_is_fatal() {
        let mut session = RenderSession::new("zz_generated_thaterror.rs");
        let err = session.resolve(&ArtifactKey::new("src/net"), "").expect_err("no package");
        assert!(matches!(err, CodegenError::MissingPackage { .. }));
    }

    #[test]
    fn test_render_has_header_and_separated_items() {
        let mut buffer = ArtifactBuffer::new("crate::net");
        buffer.push("impl A {}\n".to_string());
        buffer.push("impl B {}\n".to_string());
        assert_eq!(
            buffer.render(),
            "// @generated by thaterror from annotations in `crate::net`. Do not edit.\n\nimpl A {}\n\nimpl B {}\n"
        );
    }
}
