// SPDX-License-Identifier: Apache-2.0

//! Generation context for the code generation pipeline.
//!
//! This module provides a unified context that encapsulates everything a
//! generation run needs to know about where to look and what to write.

use std::path::{Path, PathBuf};

use path::{output_module_name, FileFilter};

use crate::PipelineError;

/// Default glob selecting files to scan for annotations.
pub const DEFAULT_FILTER: &str = "**/error.rs";
/// Default name of the generated module file.
pub const DEFAULT_OUTPUT: &str = "zz_generated_thaterror.rs";
/// Default crate source directory, relative to the root.
pub const DEFAULT_SRC_DIR: &str = "src";

/// Context containing everything needed for one generation run.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    /// Project root; filter patterns match paths relative to it.
    pub root: PathBuf,
    /// Crate source directory; module paths are derived relative to it.
    pub src_root: PathBuf,
    /// Selects the files to scan.
    pub filter: FileFilter,
    /// Name of the generated file written into each artifact directory.
    pub output_file_name: String,
    /// Run rustfmt over written files.
    pub rustfmt: bool,
}

impl GenerationContext {
    /// Create a new builder for GenerationContext
    pub fn builder() -> GenerationContextBuilder { GenerationContextBuilder::default() }

    /// Module name of the generated file.
    pub fn output_module(&self) -> String {
        self.output_file_name.trim_end_matches(".rs").to_string()
    }
}

/// Builder for GenerationContext
#[derive(Debug, Default)]
pub struct GenerationContextBuilder {
    root: Option<PathBuf>,
    src_dir: Option<PathBuf>,
    filter: Option<String>,
    output_file_name: Option<String>,
    rustfmt: bool,
}

impl GenerationContextBuilder {
    /// Set the project root
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Set the source directory, relative to the root
    pub fn src_dir(mut self, src_dir: impl Into<PathBuf>) -> Self {
        self.src_dir = Some(src_dir.into());
        self
    }

    /// Set the file filter glob
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Set the output file name
    pub fn output_file_name(mut self, name: impl Into<String>) -> Self {
        self.output_file_name = Some(name.into());
        self
    }

    /// Enable or disable rustfmt
    pub fn rustfmt(mut self, rustfmt: bool) -> Self {
        self.rustfmt = rustfmt;
        self
    }

    /// Build the GenerationContext
    pub fn build(self) -> Result<GenerationContext, PipelineError> {
        let root = self.root.unwrap_or_else(|| PathBuf::from("."));
        let src_dir = self.src_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_SRC_DIR));
        let output_file_name = self.output_file_name.unwrap_or_else(|| DEFAULT_OUTPUT.to_string());
        output_module_name(&output_file_name)?;

        // Never feed generated files back into the scanner.
        let skip = vec![format!("**/{output_file_name}")];
        let filter = FileFilter::new(self.filter.as_deref().unwrap_or(DEFAULT_FILTER), &skip)?;

        Ok(GenerationContext {
            src_root: join_root(&root, &src_dir),
            root,
            filter,
            output_file_name,
            rustfmt: self.rustfmt,
        })
    }
}

fn join_root(root: &Path, dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        root.join(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let ctx = GenerationContext::builder().root("/work").build().expect("defaults are valid");
        assert_eq!(ctx.src_root, PathBuf::from("/work/src"));
        assert_eq!(ctx.output_file_name, DEFAULT_OUTPUT);
        assert_eq!(ctx.output_module(), "zz_generated_thaterror");
        assert!(!ctx.rustfmt);
        assert!(ctx.filter.matches("src/net/error.rs"));
        assert!(!ctx.filter.matches("src/net/zz_generated_thaterror.rs"));
    }

    #[test]
    fn test_invalid_output_name() {
        let err = GenerationContext::builder()
            .output_file_name("zz.generated.rs")
            .build()
            .expect_err("not a module name");
        assert!(matches!(err, PipelineError::Path(_)), "{err:?}");
    }
}
