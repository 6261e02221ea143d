// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Annotation parser for thaterror.
//!
//! Turns the doc comments attached to Rust type declarations into
//! [`ErrorTypeSpec`](ir::ErrorTypeSpec)s:
//!
//! - `lexer` classifies each doc line into a closed set of tokens
//! - `directives` folds tokens into typed directives and builds the spec
//! - `wrap_ref` resolves wrap-from payloads into [`WrapRef`](ir::WrapRef)s
//! - `template` compiles message templates and lists the fields they read
//! - `shape` checks an annotated declaration against the code generated for it
//! - `scanner` walks a parsed source file and finds annotated declarations

use std::path::PathBuf;

use thiserror::Error;

pub mod directives;
pub mod docs;
pub mod lexer;
pub mod scanner;
pub mod shape;
pub mod template;
pub mod wrap_ref;

pub use directives::{build_spec, parse_directives, Directive};
pub use lexer::{lex_line, Token, SIGIL};
pub use scanner::parse_source;
pub use template::{CompiledTemplate, TemplateCompiler, TemplateError};
pub use wrap_ref::resolve_wrap_ref;

/// Errors in the directives attached to one declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveError {
    /// `+thaterror:<name>` is not a known directive.
    #[error("unknown directive `+thaterror:{0}`")]
    UnknownDirective(String),
    /// `+thaterror:error:end` without a preceding start.
    #[error("`+thaterror:error:end` without a matching `+thaterror:error:start`")]
    UnbalancedTemplateEnd,
    /// A template block was never closed.
    #[error("`+thaterror:error:start` is never closed by `+thaterror:error:end`")]
    UnterminatedTemplate,
    /// A wrap-from payload cannot be split into a type reference.
    #[error("cannot resolve wrap reference `{payload}`: {reason}")]
    UnresolvableWrapRef {
        /// Raw payload text
        payload: String,
        /// Why resolution failed
        reason: &'static str,
    },
    /// The message template is malformed.
    #[error("invalid message template: {0}")]
    Template(#[from] TemplateError),
}

/// Declarations the generated code cannot be compiled against.
///
/// Generated items live in a sibling module of the annotated type and read or
/// construct its fields directly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// A struct-only feature is used on an enum.
    #[error("{usage} is only supported on structs")]
    EnumOwner {
        /// Offending feature
        usage: &'static str,
    },
    /// Wrapping or transparent types need a named `source` field.
    #[error("{usage} requires a named `source` field")]
    MissingSource {
        /// Feature needing the field
        usage: &'static str,
    },
    /// `wrap` cannot initialise fields other than `source` and `backtrace`.
    #[error("wrapping types may only declare `source` and `backtrace: Backtrace` fields, found `{field}`")]
    ExtraWrapField {
        /// Unexpected field
        field: String,
    },
    /// The message template reads a field the type does not declare.
    #[error("message template reads `.{field}`, which is not a field of the type")]
    UnknownField {
        /// Missing field
        field: String,
    },
    /// A field read by generated code is private to a narrower module.
    #[error("field `{field}` is not visible from `{artifact_module}`, where the generated module is declared; widen its visibility to include that module")]
    FieldNotVisible {
        /// Hidden field
        field: String,
        /// Parent module of the generated module
        artifact_module: String,
    },
}

/// Errors raised while scanning a source file.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The template compiler could not be built.
    #[error("template compiler: {0}")]
    Compiler(#[from] TemplateError),
    /// The file is not valid Rust source.
    #[error("{}:{line}:{column}: {source}", path.display())]
    Syntax {
        /// Source file
        path: PathBuf,
        /// Line of the syntax error
        line: usize,
        /// Column of the syntax error
        column: usize,
        /// Underlying parser error
        source: syn::Error,
    },
    /// An annotation is attached to something other than a struct or enum.
    #[error("{}:{line}: `+thaterror` annotation on a {kind}; only struct and enum declarations can be annotated", path.display())]
    NotATypeDeclaration {
        /// Source file
        path: PathBuf,
        /// Line of the annotated item
        line: usize,
        /// Kind of the annotated item
        kind: &'static str,
    },
    /// Generic error types cannot be annotated.
    #[error("{}:{line}: `{type_name}` is generic; annotated error types must not have generic parameters", path.display())]
    GenericType {
        /// Source file
        path: PathBuf,
        /// Line of the type name
        line: usize,
        /// Annotated type
        type_name: String,
    },
    /// The directives of a declaration are malformed.
    #[error("{}:{line}: `{type_name}`: {source}", path.display())]
    Directive {
        /// Source file
        path: PathBuf,
        /// Line of the type name
        line: usize,
        /// Annotated type
        type_name: String,
        /// Underlying directive error
        source: DirectiveError,
    },
    /// The declaration does not fit the code generated for it.
    #[error("{}:{line}: `{type_name}`: {source}", path.display())]
    Shape {
        /// Source file
        path: PathBuf,
        /// Line of the type name
        line: usize,
        /// Annotated type
        type_name: String,
        /// Underlying shape error
        source: ShapeError,
    },
}

/// Result type for parser operations.
pub type Result<T> = std::result::Result<T, ParseError>;
