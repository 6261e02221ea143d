// SPDX-License-Identifier: Apache-2.0

//! Line tokenizer for `+thaterror` doc comment directives.
//!
//! Every doc comment line attached to a declaration is trimmed and classified
//! into exactly one [`Token`]. The grammar is closed: a line that starts with
//! the sigil followed by `:` must be one of the known directives, anything
//! else is reported as [`Token::Unknown`].

/// Sigil that marks a doc comment line as a directive.
pub const SIGIL: &str = "+thaterror";

const TEMPLATE_PREFIX: &str = ":error=";
const TEMPLATE_START: &str = ":error:start";
const TEMPLATE_END: &str = ":error:end";
const TRANSPARENT: &str = ":transparent";
const WRAP_PREFIX: &str = ":wrap=";
const IGNORE: &str = ":ignore";

/// One classified doc comment line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Bare `+thaterror`: marks the declaration without a directive.
    Marker,
    /// `+thaterror:error=<template>`
    Template(String),
    /// `+thaterror:error:start`
    TemplateStart,
    /// `+thaterror:error:end`
    TemplateEnd,
    /// `+thaterror:transparent`
    Transparent,
    /// `+thaterror:wrap=<type reference>`
    Wrap(String),
    /// `+thaterror:ignore`, the lint escape hatch.
    Ignore,
    /// `+thaterror:<something unrecognized>`
    Unknown(String),
    /// Any other line, trimmed.
    Text(String),
}

impl Token {
    /// Whether this token marks a declaration for code generation.
    pub fn is_generator_token(&self) -> bool { !matches!(self, Token::Ignore | Token::Text(_)) }
}

/// Classify one doc comment line.
pub fn lex_line(line: &str) -> Token {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix(SIGIL) else {
        return Token::Text(trimmed.to_string());
    };

    if rest.is_empty() {
        return Token::Marker;
    }
    if !rest.starts_with(':') {
        // `+thaterrors`, `+thaterror-ish`: not our sigil word.
        return Token::Text(trimmed.to_string());
    }

    if let Some(payload) = rest.strip_prefix(TEMPLATE_PREFIX) {
        Token::Template(payload.to_string())
    } else if let Some(payload) = rest.strip_prefix(WRAP_PREFIX) {
        Token::Wrap(payload.trim().to_string())
    } else {
        match rest {
            TEMPLATE_START => Token::TemplateStart,
            TEMPLATE_END => Token::TemplateEnd,
            TRANSPARENT => Token::Transparent,
            IGNORE => Token::Ignore,
            other => Token::Unknown(other.trim_start_matches(':').to_string()),
        }
    }
}

/// Whether any line carries the lint escape hatch.
pub fn has_ignore_marker<'a>(lines: impl IntoIterator<Item = &'a str>) -> bool {
    lines.into_iter().any(|line| lex_line(line) == Token::Ignore)
}
