// SPDX-License-Identifier: Apache-2.0

//! Directive parsing and spec building.
//!
//! [`parse_directives`] folds the doc comment lines of one declaration into typed
//! [`Directive`]s, handling multi-line template blocks. [`build_spec`] folds the
//! directives into an [`ErrorTypeSpec`].

use std::path::Path;

use ir::{ErrorTypeSpec, Mode, WrapRef};

use crate::lexer::{lex_line, Token};
use crate::wrap_ref::resolve_wrap_ref;
use crate::DirectiveError;

/// A recognized directive, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Render the message from this template.
    Template(String),
    /// Delegate the message to the held value.
    Transparent,
    /// Accept this type as a wrapped value.
    Wrap(WrapRef),
}

/// Parse the doc comment lines of one declaration into directives.
///
/// Inside a `+thaterror:error:start` block every line up to the matching
/// `+thaterror:error:end` is collected verbatim (trimmed), including lines that
/// look like other directives.
pub fn parse_directives<'a>(
    lines: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<Directive>, DirectiveError> {
    let mut directives = Vec::new();
    let mut collecting: Option<String> = None;

    for line in lines {
        let token = lex_line(line);

        if let Some(mut template) = collecting.take() {
            if token == Token::TemplateEnd {
                directives.push(Directive::Template(template));
            } else {
                template.push_str(line.trim());
                template.push('\n');
                collecting = Some(template);
            }
            continue;
        }

        match token {
            Token::Marker | Token::Ignore | Token::Text(_) => {}
            Token::Template(content) => directives.push(Directive::Template(content)),
            Token::TemplateStart => collecting = Some(String::new()),
            Token::TemplateEnd => return Err(DirectiveError::UnbalancedTemplateEnd),
            Token::Transparent => directives.push(Directive::Transparent),
            Token::Wrap(payload) => directives.push(Directive::Wrap(resolve_wrap_ref(&payload)?)),
            Token::Unknown(name) => return Err(DirectiveError::UnknownDirective(name)),
        }
    }

    if collecting.is_some() {
        return Err(DirectiveError::UnterminatedTemplate);
    }
    Ok(directives)
}

/// Build the spec of one annotated type from its directives.
///
/// Template and transparent directives overwrite each other, the last one wins.
/// Wrap directives accumulate in source order.
pub fn build_spec(
    type_name: &str,
    source_path: &Path,
    module_path: &str,
    directives: Vec<Directive>,
) -> ErrorTypeSpec {
    let mut spec = ErrorTypeSpec::new(type_name, source_path, module_path);
    for directive in directives {
        match directive {
            Directive::Template(content) => spec.mode = Mode::Template(content),
            Directive::Transparent => spec.mode = Mode::Transparent,
            Directive::Wrap(wrap_ref) => spec.wrap_from.push(wrap_ref),
        }
    }
    spec
}
