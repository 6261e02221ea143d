// SPDX-License-Identifier: Apache-2.0

//! Detection of untyped error contracts in function return types.
//!
//! A return type is untyped when it mentions, anywhere inside it:
//!
//! - a `dyn Error` trait object (`Box<dyn std::error::Error + Send + Sync>`)
//! - one of the catch-all error types of `anyhow` or `eyre`
//! - a name bound to one of the above by a `use` or a `type` alias in the
//!   same file

use std::collections::HashSet;

use syn::visit::{self, Visit};
use syn::{File, ItemType, ItemUse, Path, TypeParamBound, TypePath, TypeTraitObject, UseTree};

/// Crates whose catch-all error types are untyped, with those type names.
const CATCH_ALL: &[(&str, &[&str])] = &[
    ("anyhow", &["Error", "Result"]),
    ("eyre", &["Report", "Result"]),
    ("color_eyre", &["Report", "Result"]),
];

fn catch_all(first: &str, last: &str) -> bool {
    CATCH_ALL.iter().any(|(krate, names)| *krate == first && names.contains(&last))
}

/// Local names that stand for an untyped error within one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UntypedAliases {
    names: HashSet<String>,
}

impl UntypedAliases {
    /// Collect the aliases declared in `file`: `use` imports first, then
    /// `type` aliases in source order.
    pub fn collect(file: &File) -> Self {
        let mut aliases = Self::default();
        UseCollector { aliases: &mut aliases }.visit_file(file);
        TypeAliasCollector { aliases: &mut aliases }.visit_file(file);
        aliases
    }

    /// Whether `name` is an untyped alias.
    pub fn contains(&self, name: &str) -> bool { self.names.contains(name) }

    fn insert(&mut self, name: String) { self.names.insert(name); }
}

/// Describe the first untyped error found in `ty`, if any.
pub fn find_untyped(ty: &syn::Type, aliases: &UntypedAliases) -> Option<String> {
    let mut finder = UntypedFinder { aliases, found: None };
    finder.visit_type(ty);
    finder.found
}

struct UntypedFinder<'a> {
    aliases: &'a UntypedAliases,
    found: Option<String>,
}

impl<'ast> Visit<'ast> for UntypedFinder<'_> {
    fn visit_type_trait_object(&mut self, node: &'ast TypeTraitObject) {
        if self.found.is_none() {
            let is_error = node.bounds.iter().any(|bound| match bound {
                TypeParamBound::Trait(trait_bound) => {
                    trait_bound.path.segments.last().is_some_and(|s| s.ident == "Error")
                }
                _ => false,
            });
            if is_error {
                self.found = Some("dyn Error".to_string());
            }
        }
        visit::visit_type_trait_object(self, node);
    }

    fn visit_type_path(&mut self, node: &'ast TypePath) {
        if self.found.is_none() && node.qself.is_none() {
            self.found = classify_path(&node.path, self.aliases);
        }
        visit::visit_type_path(self, node);
    }
}

fn classify_path(path: &Path, aliases: &UntypedAliases) -> Option<String> {
    let segments: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
    match segments.as_slice() {
        [single] if aliases.contains(single) => Some(single.clone()),
        [first, .., last] if catch_all(first, last) => Some(format!("{first}::{last}")),
        _ => None,
    }
}

struct UseCollector<'a> {
    aliases: &'a mut UntypedAliases,
}

impl UseCollector<'_> {
    fn walk(&mut self, prefix: &mut Vec<String>, tree: &UseTree) {
        match tree {
            UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.walk(prefix, &path.tree);
                prefix.pop();
            }
            UseTree::Name(name) => {
                let ident = name.ident.to_string();
                if self.imports_catch_all(prefix, &ident) {
                    self.aliases.insert(ident);
                }
            }
            UseTree::Rename(rename) => {
                if self.imports_catch_all(prefix, &rename.ident.to_string()) {
                    self.aliases.insert(rename.rename.to_string());
                }
            }
            UseTree::Glob(_) => {
                if let Some((_, names)) =
                    CATCH_ALL.iter().find(|(krate, _)| prefix.first().map(String::as_str) == Some(*krate))
                {
                    for name in names.iter() {
                        self.aliases.insert(name.to_string());
                    }
                }
            }
            UseTree::Group(group) => {
                for tree in &group.items {
                    self.walk(prefix, tree);
                }
            }
        }
    }

    fn imports_catch_all(&self, prefix: &[String], ident: &str) -> bool {
        prefix.first().is_some_and(|first| catch_all(first, ident))
    }
}

impl<'ast> Visit<'ast> for UseCollector<'_> {
    fn visit_item_use(&mut self, node: &'ast ItemUse) {
        let mut prefix = Vec::new();
        self.walk(&mut prefix, &node.tree);
    }
}

struct TypeAliasCollector<'a> {
    aliases: &'a mut UntypedAliases,
}

impl<'ast> Visit<'ast> for TypeAliasCollector<'_> {
    fn visit_item_type(&mut self, node: &'ast ItemType) {
        if find_untyped(&node.ty, self.aliases).is_some() {
            self.aliases.insert(node.ident.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn untyped(source: &str, ty: &str) -> Option<String> {
        let file = syn::parse_file(source).expect("valid source");
        let ty: syn::Type = syn::parse_str(ty).expect("valid type");
        find_untyped(&ty, &UntypedAliases::collect(&file))
    }

    #[test]
    fn test_trait_objects() {
        assert_eq!(untyped("", "Box<dyn std::error::Error>").as_deref(), Some("dyn Error"));
        assert_eq!(
            untyped("", "Result<(), Box<dyn Error + Send + Sync>>").as_deref(),
            Some("dyn Error")
        );
        assert_eq!(untyped("", "&'static dyn Error").as_deref(), Some("dyn Error"));
        assert_eq!(untyped("", "Box<dyn std::fmt::Debug>"), None);
    }

    #[test]
    fn test_catch_all_crates() {
        assert_eq!(untyped("", "anyhow::Result<u8>").as_deref(), Some("anyhow::Result"));
        assert_eq!(untyped("", "Option<eyre::Report>").as_deref(), Some("eyre::Report"));
        assert_eq!(untyped("", "std::io::Result<()>"), None);
        assert_eq!(untyped("", "Result<(), crate::net::error::FetchError>"), None);
    }

    #[test]
    fn test_aliases() {
        assert_eq!(untyped("use anyhow::Result;", "Result<()>").as_deref(), Some("Result"));
        assert_eq!(untyped("use anyhow::{Context, Error as AnyError};", "AnyError").as_deref(), Some("AnyError"));
        assert_eq!(untyped("use eyre::*;", "Report").as_deref(), Some("Report"));
        assert_eq!(
            untyped("type BoxError = Box<dyn std::error::Error + Send + Sync>;", "Result<(), BoxError>")
                .as_deref(),
            Some("BoxError")
        );
        assert_eq!(untyped("use std::io::Result;", "Result<()>"), None);
    }
}
