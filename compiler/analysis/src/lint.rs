// SPDX-License-Identifier: Apache-2.0

//! The return-type lint.
//!
//! Selected files are grouped into packages (one per directory) and packages
//! are checked in parallel. Within a file every free function, inherent or
//! trait-impl method and trait method is checked, except methods of
//! `impl Error for ...` blocks, whose `source` signature is fixed by the trait.
//! An ignored function exempts the functions nested in its body as well.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parser::docs::{inner_doc_lines, outer_doc_lines};
use parser::lexer::has_ignore_marker;
use path::{discover, FileFilter};
use rayon::prelude::*;
use syn::visit::{self, Visit};
use syn::{Attribute, Ident, ImplItemFn, ItemFn, ItemImpl, ReturnType, TraitItemFn};
use tracing::{debug, info};

use crate::untyped::{find_untyped, UntypedAliases};
use crate::{LintError, Result, Violation};

/// Summary of a clean lint run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LintReport {
    /// Packages (directories) checked.
    pub packages: usize,
    /// Files checked.
    pub files: usize,
    /// Functions checked.
    pub functions: usize,
}

/// Lint every file under `root` selected by `filter`.
///
/// Returns the first violation, in package order, as an error.
pub fn lint(root: &Path, filter: &FileFilter) -> Result<LintReport> {
    let packages: Vec<(PathBuf, Vec<PathBuf>)> =
        group_packages(discover(root, root, filter)?).into_iter().collect();
    debug!(packages = packages.len(), "linting packages");

    let results: Vec<Result<LintReport>> =
        packages.par_iter().map(|(_, files)| lint_package(files)).collect();

    let mut report = LintReport { packages: packages.len(), ..LintReport::default() };
    for result in results {
        let package = result?;
        report.files += package.files;
        report.functions += package.functions;
    }
    Ok(report)
}

fn group_packages(files: Vec<PathBuf>) -> BTreeMap<PathBuf, Vec<PathBuf>> {
    let mut packages: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
    for file in files {
        let dir = file.parent().map(Path::to_path_buf).unwrap_or_default();
        packages.entry(dir).or_default().push(file);
    }
    packages
}

fn lint_package(files: &[PathBuf]) -> Result<LintReport> {
    let mut report = LintReport::default();
    for file in files {
        info!(path = %file.display(), "lint file");
        let source = fs::read_to_string(file)
            .map_err(|source| LintError::Read { path: file.clone(), source })?;
        report.functions += lint_source(file, &source)?;
        report.files += 1;
    }
    Ok(report)
}

/// Lint one file's source text, returning the number of functions checked.
pub fn lint_source(path: &Path, source: &str) -> Result<usize> {
    let file = syn::parse_file(source).map_err(|source| {
        let start = source.span().start();
        LintError::Syntax { path: path.to_path_buf(), line: start.line, column: start.column + 1, source }
    })?;

    if has_ignore_marker(inner_doc_lines(&file.attrs).iter().map(String::as_str)) {
        debug!(path = %path.display(), "file ignored");
        return Ok(0);
    }

    let aliases = UntypedAliases::collect(&file);
    let mut checker = ReturnTypeChecker { path, aliases: &aliases, checked: 0, violation: None };
    checker.visit_file(&file);

    match checker.violation {
        Some(violation) => Err(LintError::Violation(violation)),
        None => Ok(checker.checked),
    }
}

struct ReturnTypeChecker<'a> {
    path: &'a Path,
    aliases: &'a UntypedAliases,
    checked: usize,
    violation: Option<Violation>,
}

impl ReturnTypeChecker<'_> {
    /// Check one signature; returns whether its body should be visited.
    fn check(&mut self, attrs: &[Attribute], ident: &Ident, output: &ReturnType) -> bool {
        if self.violation.is_some() {
            return false;
        }
        self.checked += 1;
        if has_ignore_marker(outer_doc_lines(attrs).iter().map(String::as_str)) {
            return false;
        }
        let ReturnType::Type(_, ty) = output else { return true };

        if let Some(untyped) = find_untyped(ty, self.aliases) {
            let start = ident.span().start();
            self.violation = Some(Violation {
                function: ident.to_string(),
                path: self.path.to_path_buf(),
                line: start.line,
                column: start.column + 1,
                untyped,
            });
        }
        self.violation.is_none()
    }
}

impl<'ast> Visit<'ast> for ReturnTypeChecker<'_> {
    fn visit_item_fn(&mut self, node: &'ast ItemFn) {
        if self.check(&node.attrs, &node.sig.ident, &node.sig.output) {
            visit::visit_item_fn(self, node);
        }
    }

    fn visit_impl_item_fn(&mut self, node: &'ast ImplItemFn) {
        if self.check(&node.attrs, &node.sig.ident, &node.sig.output) {
            visit::visit_impl_item_fn(self, node);
        }
    }

    fn visit_trait_item_fn(&mut self, node: &'ast TraitItemFn) {
        if self.check(&node.attrs, &node.sig.ident, &node.sig.output) {
            visit::visit_trait_item_fn(self, node);
        }
    }

    fn visit_item_impl(&mut self, node: &'ast ItemImpl) {
        let implements_error = node
            .trait_
            .as_ref()
            .and_then(|(_, path, _)| path.segments.last())
            .is_some_and(|segment| segment.ident == "Error");
        if !implements_error {
            visit::visit_item_impl(self, node);
        }
    }
}
