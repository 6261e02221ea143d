// SPDX-License-Identifier: Apache-2.0

//! Doc comment extraction from `syn` attributes.
//!
//! `///` and `/** */` comments reach the syntax tree as `#[doc = "..."]`
//! attributes. Block comments arrive as one attribute spanning several lines,
//! which are split and stripped of their leading `*` decoration.

use syn::{AttrStyle, Attribute, Expr, ExprLit, Lit, Meta};

/// Doc lines of the outer (`///`) doc attributes in `attrs`, in source order.
pub fn outer_doc_lines(attrs: &[Attribute]) -> Vec<String> {
    doc_lines(attrs, |style| matches!(style, AttrStyle::Outer))
}

/// Doc lines of the inner (`//!`) doc attributes in `attrs`, in source order.
pub fn inner_doc_lines(attrs: &[Attribute]) -> Vec<String> {
    doc_lines(attrs, |style| matches!(style, AttrStyle::Inner(_)))
}

fn doc_lines(attrs: &[Attribute], keep: impl Fn(&AttrStyle) -> bool) -> Vec<String> {
    let mut lines = Vec::new();
    for attr in attrs.iter().filter(|attr| keep(&attr.style) && attr.path().is_ident("doc")) {
        let Meta::NameValue(name_value) = &attr.meta else { continue };
        let Expr::Lit(ExprLit { lit: Lit::Str(text), .. }) = &name_value.value else { continue };

        let text = text.value();
        if text.contains('\n') {
            lines.extend(text.lines().map(|line| {
                let line = line.trim_start();
                line.strip_prefix('*').unwrap_or(line).to_string()
            }));
        } else {
            lines.push(text);
        }
    }
    lines
}
