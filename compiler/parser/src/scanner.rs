// SPDX-License-Identifier: Apache-2.0

//! Source file scanning.
//!
//! Parses one Rust source file with `syn`, walks its items in source order
//! (descending into inline `mod` blocks) and turns every annotated declaration
//! into an [`ErrorTypeSpec`]. Each declaration is checked against the code that
//! will be generated for it before it is accepted.

use std::path::Path;

use ir::{ErrorTypeSpec, Mode};
use syn::spanned::Spanned;
use syn::{Attribute, Item};
use tracing::debug;

use crate::directives::{build_spec, parse_directives};
use crate::docs::outer_doc_lines;
use crate::lexer::lex_line;
use crate::shape::{artifact_module, check_owner};
use crate::template::TemplateCompiler;
use crate::{DirectiveError, ParseError, Result};

struct Scan<'a> {
    path: &'a Path,
    artifact_module: String,
    templates: TemplateCompiler,
}

/// Parse `source` (the contents of `path`, declared as module `module_path`)
/// and build a spec for every annotated type declaration, in source order.
pub fn parse_source(path: &Path, source: &str, module_path: &str) -> Result<Vec<ErrorTypeSpec>> {
    let file = syn::parse_file(source).map_err(|source| {
        let start = source.span().start();
        ParseError::Syntax {
            path: path.to_path_buf(),
            line: start.line,
            column: start.column + 1,
            source,
        }
    })?;

    let scan = Scan {
        path,
        artifact_module: artifact_module(path, module_path),
        templates: TemplateCompiler::new()?,
    };

    let mut specs = Vec::new();
    collect_items(&scan, module_path, &file.items, &mut specs)?;
    Ok(specs)
}

fn collect_items(
    scan: &Scan<'_>,
    module_path: &str,
    items: &[Item],
    specs: &mut Vec<ErrorTypeSpec>,
) -> Result<()> {
    for item in items {
        let docs = outer_doc_lines(item_attrs(item));
        if docs.iter().any(|line| lex_line(line).is_generator_token()) {
            let spec = annotated_spec(scan, module_path, item, &docs)?;
            debug!(type_name = %spec.type_name, module = %spec.module_path, "found annotated type");
            specs.push(spec);
        }

        if let Item::Mod(module) = item {
            if let Some((_, inner)) = &module.content {
                let nested = format!("{}::{}", module_path, module.ident);
                collect_items(scan, &nested, inner, specs)?;
            }
        }
    }
    Ok(())
}

fn annotated_spec(
    scan: &Scan<'_>,
    module_path: &str,
    item: &Item,
    docs: &[String],
) -> Result<ErrorTypeSpec> {
    let path = scan.path;
    let (ident, generics) = match item {
        Item::Struct(item) => (&item.ident, &item.generics),
        Item::Enum(item) => (&item.ident, &item.generics),
        other => {
            return Err(ParseError::NotATypeDeclaration {
                path: path.to_path_buf(),
                line: other.span().start().line,
                kind: item_kind(other),
            });
        }
    };

    let type_name = ident.to_string();
    let line = ident.span().start().line;
    if !generics.params.is_empty() {
        return Err(ParseError::GenericType { path: path.to_path_buf(), line, type_name });
    }

    let directive_error = |source: DirectiveError| ParseError::Directive {
        path: path.to_path_buf(),
        line,
        type_name: type_name.clone(),
        source,
    };
    let directives = parse_directives(docs.iter().map(String::as_str)).map_err(directive_error)?;
    let mut spec = build_spec(&type_name, path, module_path, directives);

    let template = match &spec.mode {
        Mode::Template(template) => {
            Some(scan.templates.compile(template).map_err(|e| directive_error(e.into()))?)
        }
        Mode::Transparent => None,
    };
    spec.backtrace = check_owner(&spec, item, template.as_ref(), &scan.artifact_module).map_err(
        |source| ParseError::Shape { path: path.to_path_buf(), line, type_name: type_name.clone(), source },
    )?;
    Ok(spec)
}

fn item_attrs(item: &Item) -> &[Attribute] {
    match item {
        Item::Const(item) => &item.attrs,
        Item::Enum(item) => &item.attrs,
        Item::ExternCrate(item) => &item.attrs,
        Item::Fn(item) => &item.attrs,
        Item::ForeignMod(item) => &item.attrs,
        Item::Impl(item) => &item.attrs,
        Item::Macro(item) => &item.attrs,
        Item::Mod(item) => &item.attrs,
        Item::Static(item) => &item.attrs,
        Item::Struct(item) => &item.attrs,
        Item::Trait(item) => &item.attrs,
        Item::TraitAlias(item) => &item.attrs,
        Item::Type(item) => &item.attrs,
        Item::Union(item) => &item.attrs,
        Item::Use(item) => &item.attrs,
        _ => &[],
    }
}

fn item_kind(item: &Item) -> &'static str {
    match item {
        Item::Const(_) => "constant",
        Item::Enum(_) => "enum",
        Item::ExternCrate(_) => "extern crate",
        Item::Fn(_) => "function",
        Item::ForeignMod(_) => "extern block",
        Item::Impl(_) => "impl block",
        Item::Macro(_) => "macro invocation",
        Item::Mod(_) => "module",
        Item::Static(_) => "static",
        Item::Struct(_) => "struct",
        Item::Trait(_) => "trait",
        Item::TraitAlias(_) => "trait alias",
        Item::Type(_) => "type alias",
        Item::Union(_) => "union",
        Item::Use(_) => "use declaration",
        _ => "item",
    }
}
