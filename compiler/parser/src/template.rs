// SPDX-License-Identifier: Apache-2.0

//! Message template compiler.
//!
//! Templates are literal text interleaved with `{{ ... }}` actions. The
//! supported actions are field references (`{{.field}}`, `{{.a.b}}`, `{{.0}}`)
//! and comments (`{{/* ... */}}`). A `-` just inside the delimiters
//! (`{{- .field -}}`) trims the whitespace of the adjacent literal text.
//!
//! The scanner compiles each template to check the fields it reads against
//! the annotated type; the code generator turns it into the body of a
//! `Display::fmt` implementation.

use regex::Regex;
use thiserror::Error;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Errors found while compiling a message template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A `{{` is never closed.
    #[error("unterminated action starting at byte {offset}")]
    Unterminated {
        /// Byte offset of the opening delimiter
        offset: usize,
    },
    /// A `{{/*` comment is not closed by `*/}}`.
    #[error("unterminated comment starting at byte {offset}")]
    UnterminatedComment {
        /// Byte offset of the opening delimiter
        offset: usize,
    },
    /// The action is neither a field reference nor a comment.
    #[error("unsupported action `{{{{{action}}}}}`: only field references like `{{{{.field}}}}` are allowed")]
    UnsupportedAction {
        /// Trimmed action text
        action: String,
    },
    /// The field reference regex failed to build.
    #[error("invalid field path pattern: {0}")]
    Pattern(String),
}

/// A compiled template: a `format!` string and the receiver fields it reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTemplate {
    pieces: Vec<Piece>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Text(String),
    Field(String),
}

impl CompiledTemplate {
    /// Field paths referenced by the template, in order of appearance.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.pieces.iter().filter_map(|piece| match piece {
            Piece::Field(path) => Some(path.as_str()),
            Piece::Text(_) => None,
        })
    }

    /// Whether the template renders to the empty string.
    pub fn is_empty(&self) -> bool { self.pieces.is_empty() }

    /// Body of `fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result`.
    pub fn render_body(&self) -> String {
        if self.pieces.is_empty() {
            return "Ok(())".to_string();
        }

        let mut format = String::new();
        let mut args = Vec::new();
        for piece in &self.pieces {
            match piece {
                Piece::Text(text) => format.push_str(&text.replace('{', "{{").replace('}', "}}")),
                Piece::Field(path) => {
                    format.push_str("{}");
                    args.push(format!("self.{path}"));
                }
            }
        }

        if args.is_empty() {
            // Only literal text: no formatting machinery needed.
            let literal: String = self.pieces.iter().map(piece_text).collect();
            format!("f.write_str({literal:?})")
        } else {
            format!("::std::write!(f, {format:?}, {})", args.join(", "))
        }
    }
}

fn piece_text(piece: &Piece) -> &str {
    match piece {
        Piece::Text(text) => text,
        Piece::Field(_) => "",
    }
}

/// Compiles templates; holds the field-path matcher.
#[derive(Debug, Clone)]
pub struct TemplateCompiler {
    field_path: Regex,
}

impl TemplateCompiler {
    /// Create a compiler.
    pub fn new() -> Result<Self, TemplateError> {
        let field_path = Regex::new(r"^\.((?:[A-Za-z_][A-Za-z0-9_]*|[0-9]+)(?:\.(?:[A-Za-z_][A-Za-z0-9_]*|[0-9]+))*)$")
            .map_err(|e| TemplateError::Pattern(e.to_string()))?;
        Ok(Self { field_path })
    }

    /// Compile `template`.
    pub fn compile(&self, template: &str) -> Result<CompiledTemplate, TemplateError> {
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut trim_next = false;
        let mut rest = template;
        let mut offset = 0;

        while let Some(start) = rest.find(OPEN) {
            push_literal(&mut literal, &rest[..start], trim_next);

            let after_open = &rest[start + OPEN.len()..];
            let (action, consumed) = if after_open.trim_start_matches('-').trim_start().starts_with("/*") {
                let end = after_open
                    .find("*/")
                    .and_then(|c| after_open[c + 2..].find(CLOSE).map(|e| c + 2 + e))
                    .ok_or(TemplateError::UnterminatedComment { offset: offset + start })?;
                (&after_open[..end], end)
            } else {
                let end = after_open
                    .find(CLOSE)
                    .ok_or(TemplateError::Unterminated { offset: offset + start })?;
                (&after_open[..end], end)
            };

            let (action, trim_before, trim_after) = trim_markers(action);
            if trim_before {
                let kept = literal.trim_end().len();
                literal.truncate(kept);
            }
            trim_next = trim_after;

            if !is_comment(action) {
                let path = self.field_path(action)?;
                if !literal.is_empty() {
                    pieces.push(Piece::Text(std::mem::take(&mut literal)));
                }
                pieces.push(Piece::Field(path));
            }

            let advance = start + OPEN.len() + consumed + CLOSE.len();
            offset += advance;
            rest = &rest[advance..];
        }

        push_literal(&mut literal, rest, trim_next);
        if !literal.is_empty() {
            pieces.push(Piece::Text(literal));
        }
        Ok(CompiledTemplate { pieces })
    }

    fn field_path(&self, action: &str) -> Result<String, TemplateError> {
        self.field_path
            .captures(action)
            .and_then(|caps| caps.get(1))
            .map(|path| path.as_str().to_string())
            .ok_or_else(|| TemplateError::UnsupportedAction { action: action.to_string() })
    }
}

fn push_literal(literal: &mut String, text: &str, trim_start: bool) {
    literal.push_str(if trim_start { text.trim_start() } else { text });
}

/// Strip `-` trim markers and surrounding spaces from an action.
fn trim_markers(action: &str) -> (&str, bool, bool) {
    let (action, trim_before) = match action.strip_prefix("- ") {
        Some(rest) => (rest, true),
        None if action == "-" => ("", true),
        None => (action, false),
    };
    let (action, trim_after) = match action.strip_suffix(" -") {
        Some(rest) => (rest, true),
        None => (action, false),
    };
    (action.trim(), trim_before, trim_after)
}

fn is_comment(action: &str) -> bool { action.starts_with("/*") && action.ends_with("*/") }

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(template: &str) -> Result<CompiledTemplate, TemplateError> {
        TemplateCompiler::new().expect("pattern compiles").compile(template)
    }

    #[test]
    fn test_field_references() {
        let compiled = compile("field={{.Field}} nested={{ .a.b }} tuple={{.0}}").expect("valid");
        assert_eq!(compiled.fields().collect::<Vec<_>>(), vec!["Field", "a.b", "0"]);
        assert_eq!(
            compiled.render_body(),
            r#"::std::write!(f, "field={} nested={} tuple={}", self.Field, self.a.b, self.0)"#
        );
    }

    #[test]
    fn test_empty_and_literal_templates() {
        let empty = compile("").expect("valid");
        assert!(empty.is_empty());
        assert_eq!(empty.render_body(), "Ok(())");

        assert_eq!(
            compile("plain \"text\" {braces}\n").expect("valid").render_body(),
            r#"f.write_str("plain \"text\" {braces}\n")"#
        );
    }

    #[test]
    fn test_literal_braces_are_escaped_in_format_string() {
        let compiled = compile("{x} {{.y}}").expect("valid");
        assert_eq!(compiled.render_body(), r#"::std::write!(f, "{{x}} {}", self.y)"#);
    }

    #[test]
    fn test_comments_are_dropped() {
        let compiled = compile("a{{/* note }} here */}}b").expect("valid");
        assert_eq!(compiled.render_body(), r#"f.write_str("ab")"#);
    }

    #[test]
    fn test_trim_markers() {
        let compiled = compile("value:   {{- .v -}}   end").expect("valid");
        assert_eq!(compiled.render_body(), r#"::std::write!(f, "value:{}end", self.v)"#);
    }

    #[test]
    fn test_rejected_templates() {
        assert_eq!(compile("bad {{.x").expect_err("open"), TemplateError::Unterminated { offset: 4 });
        assert_eq!(
            compile("{{/* open }}").expect_err("comment"),
            TemplateError::UnterminatedComment { offset: 0 }
        );
        for action in ["{{.}}", "{{if .x}}y{{end}}", "{{.x | printf}}", "{{ x }}", "{{.a..b}}"] {
            assert!(
                matches!(compile(action), Err(TemplateError::UnsupportedAction { .. })),
                "{action} should be rejected"
            );
        }
    }
}
