// SPDX-License-Identifier: Apache-2.0

//! Owner shape checks.
//!
//! The generated module is declared in the module of the directory holding the
//! annotated file (the *artifact module*). From there it reads the fields the
//! message template names, delegates to `source`, and builds wrapping types
//! with a struct literal. Each of those needs the field to exist and to be
//! visible from the artifact module.

use std::path::Path;

use ir::ErrorTypeSpec;
use syn::{Field, Fields, Item, Type, Visibility};

use crate::template::CompiledTemplate;
use crate::ShapeError;

/// Field holding the wrapped or delegated-to error.
pub const SOURCE_FIELD: &str = "source";
/// Optional field of wrapping types, captured by `wrap`.
pub const BACKTRACE_FIELD: &str = "backtrace";

/// Module in which the generated module for `path` is declared.
///
/// `src/net/error.rs` (module `crate::net::error`) gives `crate::net`; files
/// naming their directory's module (`mod.rs`, the crate root) give their own
/// module.
pub fn artifact_module(path: &Path, module_path: &str) -> String {
    let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    match module_path.rsplit_once("::") {
        Some((parent, last)) if last.trim_start_matches("r#") == stem => parent.to_string(),
        _ => module_path.to_string(),
    }
}

/// Check `item` against the code generated for `spec`.
///
/// Returns whether the generated `wrap` must capture a backtrace.
pub fn check_owner(
    spec: &ErrorTypeSpec,
    item: &Item,
    template: Option<&CompiledTemplate>,
    artifact_module: &str,
) -> Result<bool, ShapeError> {
    let template_fields: Vec<&str> = template
        .map(|t| t.fields().map(|path| path.split('.').next().unwrap_or(path)).collect())
        .unwrap_or_default();

    let fields = match item {
        Item::Struct(item) => &item.fields,
        _ => {
            let usage = if spec.is_wrapping() {
                Some("`+thaterror:wrap`")
            } else if spec.mode.is_transparent() {
                Some("`+thaterror:transparent`")
            } else if !template_fields.is_empty() {
                Some("a message template reading fields")
            } else {
                None
            };
            return match usage {
                Some(usage) => Err(ShapeError::EnumOwner { usage }),
                None => Ok(false),
            };
        }
    };

    let mut read: Vec<&Field> = Vec::new();
    let mut backtrace = false;

    if spec.is_wrapping() || spec.mode.is_transparent() {
        let usage = if spec.is_wrapping() { "`+thaterror:wrap`" } else { "`+thaterror:transparent`" };
        let source = named_field(fields, SOURCE_FIELD).ok_or(ShapeError::MissingSource { usage })?;
        read.push(source);
    }

    if spec.is_wrapping() {
        for (index, field) in fields.iter().enumerate() {
            match &field.ident {
                Some(ident) if ident == SOURCE_FIELD => {}
                Some(ident) if ident == BACKTRACE_FIELD && is_backtrace(&field.ty) => {
                    backtrace = true;
                    read.push(field);
                }
                Some(ident) => return Err(ShapeError::ExtraWrapField { field: ident.to_string() }),
                None => return Err(ShapeError::ExtraWrapField { field: index.to_string() }),
            }
        }
    }

    for name in template_fields {
        let field = field_by_name(fields, name)
            .ok_or_else(|| ShapeError::UnknownField { field: name.to_string() })?;
        read.push(field);
    }

    for (index, field) in fields.iter().enumerate() {
        if read.iter().any(|r| std::ptr::eq(*r, field))
            && !visible_from(&field.vis, &spec.module_path, artifact_module)
        {
            let name = field.ident.as_ref().map_or_else(|| index.to_string(), ToString::to_string);
            return Err(ShapeError::FieldNotVisible {
                field: name,
                artifact_module: artifact_module.to_string(),
            });
        }
    }

    Ok(backtrace)
}

fn named_field<'a>(fields: &'a Fields, name: &str) -> Option<&'a Field> {
    fields.iter().find(|f| f.ident.as_ref().is_some_and(|ident| ident == name))
}

/// Named field `name`, or the tuple field at index `name`.
fn field_by_name<'a>(fields: &'a Fields, name: &str) -> Option<&'a Field> {
    match fields {
        Fields::Named(_) => named_field(fields, name),
        Fields::Unnamed(unnamed) => name.parse::<usize>().ok().and_then(|i| unnamed.unnamed.iter().nth(i)),
        Fields::Unit => None,
    }
}

fn is_backtrace(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path.path.segments.last().is_some_and(|s| s.ident == "Backtrace"),
        _ => false,
    }
}

/// Whether a field with visibility `vis`, declared in `owner_module`, can be
/// named from `module`.
pub fn visible_from(vis: &Visibility, owner_module: &str, module: &str) -> bool {
    let scope = match vis {
        Visibility::Public(_) => return true,
        Visibility::Inherited => owner_module.to_string(),
        Visibility::Restricted(restricted) => match restricted_scope(&restricted.path, owner_module) {
            Some(scope) => scope,
            None => return false,
        },
    };
    module == scope || module.starts_with(&format!("{scope}::"))
}

/// Module named by `pub(in path)`, `pub(crate)`, `pub(self)` or `pub(super)`.
fn restricted_scope(path: &syn::Path, owner_module: &str) -> Option<String> {
    let mut segments = path.segments.iter().map(|s| s.ident.to_string());
    let mut scope: Vec<String> = match segments.next()?.as_str() {
        "crate" => vec!["crate".to_string()],
        "self" => owner_module.split("::").map(String::from).collect(),
        "super" => {
            let mut parent: Vec<String> = owner_module.split("::").map(String::from).collect();
            parent.pop();
            parent
        }
        _ => return None,
    };
    for segment in segments {
        match segment.as_str() {
            "super" => {
                scope.pop();
            }
            "self" => {}
            _ => scope.push(segment),
        }
    }
    (!scope.is_empty()).then(|| scope.join("::"))
}
