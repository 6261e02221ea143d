// SPDX-License-Identifier: Apache-2.0

//! Path utility functions.
//!
//! Generated artifacts are keyed by the directory of the source file that
//! declared an error type. The Rust module path of a file or directory is
//! derived textually from its location under the crate's source root.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use ir::naming::is_identifier;
use thiserror::Error;

/// Errors raised while deriving module paths or artifact locations.
#[derive(Debug, Error)]
pub enum PathError {
    /// The file does not live under the configured source root.
    #[error("{} is not under the source root {}", path.display(), src_root.display())]
    OutsideSourceRoot {
        /// Offending path
        path: PathBuf,
        /// Configured source root
        src_root: PathBuf,
    },
    /// A path component cannot be used as a Rust module name.
    #[error("{}: `{component}` is not a valid module name", path.display())]
    InvalidModuleName {
        /// Offending path
        path: PathBuf,
        /// Component that failed validation
        component: String,
    },
    /// The output file name does not name a Rust module file.
    #[error("output file name `{0}` must be `<identifier>.rs`")]
    InvalidOutputName(String),
    /// A glob pattern does not compile.
    #[error("invalid glob pattern `{pattern}`: {message}")]
    Pattern {
        /// Pattern as written
        pattern: String,
        /// Compiler message
        message: String,
    },
    /// Directory traversal failed.
    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}

/// Result alias for path operations.
pub type Result<T> = std::result::Result<T, PathError>;

/// Identity of one generated artifact: the directory its file is written to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArtifactKey(PathBuf);

impl ArtifactKey {
    /// Key for the artifact of directory `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self { Self(normalize(dir.as_ref())) }

    /// Key for the artifact collecting declarations of `source_file`.
    pub fn for_source(source_file: &Path) -> Self {
        Self::new(source_file.parent().unwrap_or_else(|| Path::new("")))
    }

    /// Directory of the artifact.
    pub fn dir(&self) -> &Path { &self.0 }

    /// Path of the generated file for this artifact.
    pub fn output_path(&self, output_file_name: &str) -> PathBuf { self.0.join(output_file_name) }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0.display()) }
}

/// Lexically normalize a path by dropping `.` components and folding `..`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// `path` relative to `root`, with `/` separators, for glob matching.
pub fn relative_slash_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Module path of the directory `dir` under `src_root`.
///
/// ```
/// use std::path::Path;
/// use thaterror_path::module_path_for_dir;
/// let src = Path::new("src");
/// assert_eq!(module_path_for_dir(src, Path::new("src/net")).unwrap(), "crate::net");
/// assert_eq!(module_path_for_dir(src, Path::new("src")).unwrap(), "crate");
/// ```
pub fn module_path_for_dir(src_root: &Path, dir: &Path) -> Result<String> {
    let relative = strip_src_root(src_root, dir)?;
    let mut module = String::from("crate");
    for component in relative.components() {
        let name = component.as_os_str().to_string_lossy();
        push_segment(&mut module, &name, dir)?;
    }
    Ok(module)
}

/// Module path of the source file `file` under `src_root`.
///
/// `mod.rs`, `lib.rs` and `main.rs` name their directory's module.
///
/// ```
/// use std::path::Path;
/// use thaterror_path::module_path_for_file;
/// let src = Path::new("src");
/// assert_eq!(module_path_for_file(src, Path::new("src/net/error.rs")).unwrap(), "crate::net::error");
/// assert_eq!(module_path_for_file(src, Path::new("src/net/mod.rs")).unwrap(), "crate::net");
/// assert_eq!(module_path_for_file(src, Path::new("src/lib.rs")).unwrap(), "crate");
/// ```
pub fn module_path_for_file(src_root: &Path, file: &Path) -> Result<String> {
    let dir = file.parent().unwrap_or_else(|| Path::new(""));
    let mut module = module_path_for_dir(src_root, dir)?;
    let stem = file.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();

    let names_dir_module = matches!(stem.as_str(), "mod")
        || (module == "crate" && matches!(stem.as_str(), "lib" | "main"));
    if !names_dir_module {
        push_segment(&mut module, &stem, file)?;
    }
    Ok(module)
}

/// Directory whose artifact owns types declared in the crate module
/// `module_path`, or `None` when the path is not rooted at `crate`.
///
/// `crate::a::b` lives in `<src>/a/b.rs` when that file exists, and in
/// `<src>/a/b/mod.rs` otherwise.
pub fn artifact_dir_for_module(src_root: &Path, module_path: &str) -> Option<PathBuf> {
    let mut segments = module_path.split("::");
    if segments.next() != Some("crate") {
        return None;
    }
    let segments: Vec<&str> = segments.map(|s| s.trim_start_matches("r#")).collect();
    let Some((last, parents)) = segments.split_last() else {
        return Some(normalize(src_root));
    };

    let parent_dir = parents.iter().fold(src_root.to_path_buf(), |dir, s| dir.join(s));
    if parent_dir.join(format!("{last}.rs")).is_file() {
        Some(normalize(&parent_dir))
    } else {
        Some(normalize(&parent_dir.join(last)))
    }
}

/// Module name of a generated output file such as `zz_generated_thaterror.rs`.
pub fn output_module_name(output_file_name: &str) -> Result<String> {
    let stem = output_file_name
        .strip_suffix(".rs")
        .filter(|stem| is_identifier(stem))
        .ok_or_else(|| PathError::InvalidOutputName(output_file_name.to_string()))?;
    Ok(stem.to_string())
}

fn strip_src_root(src_root: &Path, path: &Path) -> Result<PathBuf> {
    let src_root = normalize(src_root);
    let path_norm = normalize(path);
    path_norm.strip_prefix(&src_root).map(Path::to_path_buf).map_err(|_| {
        PathError::OutsideSourceRoot { path: path.to_path_buf(), src_root: src_root.clone() }
    })
}

fn push_segment(module: &mut String, name: &str, path: &Path) -> Result<()> {
    if !is_identifier(name) {
        return Err(PathError::InvalidModuleName {
            path: path.to_path_buf(),
            component: name.to_string(),
        });
    }
    module.push_str("::");
    module.push_str(name);
    Ok(())
}
