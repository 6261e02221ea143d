// SPDX-License-Identifier: Apache-2.0

//! Source file discovery.
//!
//! Files are visited in a deterministic order (directory entries sorted by
//! file name) and matched by glob against their `/`-separated path relative to
//! the project root. Hidden directories and `target/` are never entered.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use walkdir::{DirEntry, WalkDir};

use crate::path_utils::{relative_slash_path, PathError, Result};

const MATCH_OPTIONS: MatchOptions =
    MatchOptions { case_sensitive: true, require_literal_separator: true, require_literal_leading_dot: false };

/// Include/skip glob filter over root-relative paths.
#[derive(Debug, Clone)]
pub struct FileFilter {
    include: Pattern,
    skip: Vec<Pattern>,
}

impl FileFilter {
    /// Build a filter from an include pattern and skip patterns.
    pub fn new(include: &str, skip: &[String]) -> Result<Self> {
        Ok(Self { include: compile_pattern(include)?, skip: compile_patterns(skip)? })
    }

    /// Whether the root-relative path `relative` is selected.
    pub fn matches(&self, relative: &str) -> bool {
        self.include.matches_with(relative, MATCH_OPTIONS)
            && !self.skip.iter().any(|skip| skip.matches_with(relative, MATCH_OPTIONS))
    }
}

/// Compile every pattern in `patterns`.
pub fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns.iter().map(|pattern| compile_pattern(pattern)).collect()
}

fn compile_pattern(pattern: &str) -> Result<Pattern> {
    Pattern::new(pattern).map_err(|e| PathError::Pattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// Files under `start` selected by `filter`, in traversal order.
///
/// Paths are matched relative to `root`, and returned joined onto `start`.
pub fn discover(root: &Path, start: &Path, filter: &FileFilter) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(start)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_excluded_dir(entry));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if filter.matches(&relative_slash_path(root, entry.path())) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn is_excluded_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || name == "target"
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().expect("has parent")).expect("mkdir");
        fs::write(path, "").expect("write");
    }

    #[test]
    fn test_filter_matches_relative_paths() {
        let filter = FileFilter::new("**/*.rs", &["**/zz_generated_*.rs".to_string()]).expect("valid");
        assert!(filter.matches("src/lib.rs"));
        assert!(filter.matches("lib.rs"));
        assert!(!filter.matches("src/net/zz_generated_thaterror.rs"));
        assert!(!filter.matches("README.md"));

        let errors = FileFilter::new("**/error.rs", &[]).expect("valid");
        assert!(errors.matches("src/error.rs"));
        assert!(errors.matches("src/net/error.rs"));
        assert!(!errors.matches("src/net/my_error.rs"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = FileFilter::new("src/[", &[]).expect_err("unclosed class");
        assert!(matches!(err, PathError::Pattern { .. }), "{err:?}");
    }

    #[test]
    fn test_discover_is_sorted_and_skips_hidden_and_target() {
        let tmp = TempDir::new().expect("tempdir");
        let root = tmp.path();
        for file in [
            "src/zeta/error.rs",
            "src/alpha/error.rs",
            "src/error.rs",
            "src/.hidden/error.rs",
            "target/debug/error.rs",
        ] {
            touch(root, file);
        }

        let filter = FileFilter::new("**/error.rs", &[]).expect("valid");
        let found: Vec<String> = discover(root, root, &filter)
            .expect("walk")
            .iter()
            .map(|path| relative_slash_path(root, path))
            .collect();
        assert_eq!(found, vec!["src/alpha/error.rs", "src/error.rs", "src/zeta/error.rs"]);
    }
}
