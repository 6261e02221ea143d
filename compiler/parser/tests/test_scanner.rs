use std::path::Path;

use ir::{Mode, WrapRef};
use pretty_assertions::assert_eq;
use thaterror_parser::{parse_source, DirectiveError, ParseError, ShapeError, TemplateError};

const PATH: &str = "src/net/error.rs";
const MODULE: &str = "crate::net::error";

#[test]
fn test_annotated_types_in_source_order() {
    let source = r#"
/// Raised when the peer hangs up.
/// +thaterror:error=connection to {{.peer}} closed
#[derive(Debug)]
pub struct Closed {
    pub peer: String,
}

/// Not annotated.
pub struct Plain;

/// +thaterror:transparent
/// +thaterror:wrap=*"std::io".Error
#[derive(Debug)]
pub struct Io {
    pub(super) source: super::zz_generated_thaterror::IoWrapUnion,
}

/// +thaterror
#[derive(Debug)]
pub enum Kind {
    A,
    B,
}
"#;

    let specs = parse_source(Path::new(PATH), source, MODULE).expect("source should parse");
    let names: Vec<&str> = specs.iter().map(|s| s.type_name.as_str()).collect();
    assert_eq!(names, vec!["Closed", "Io", "Kind"]);

    assert_eq!(specs[0].mode, Mode::Template("connection to {{.peer}} closed".to_string()));
    assert_eq!(specs[0].module_path, MODULE);
    assert_eq!(specs[0].source_path, Path::new(PATH));
    assert!(specs[0].wrap_from.is_empty());

    assert_eq!(specs[1].mode, Mode::Transparent);
    assert_eq!(specs[1].wrap_from, vec![WrapRef::qualified("std::io", "Error").boxed()]);

    assert_eq!(specs[2].mode, Mode::default());
}

#[test]
fn test_inline_modules_extend_module_path() {
    let source = r#"
pub mod inner {
    /// +thaterror:error=inner failure
    #[derive(Debug)]
    pub struct Failure;

    mod deeper {
        /// +thaterror:error=deep
        #[derive(Debug)]
        pub struct Deep;
    }
}
"#;

    let specs = parse_source(Path::new(PATH), source, MODULE).expect("source should parse");
    let paths: Vec<String> = specs.iter().map(|s| s.type_path()).collect();
    assert_eq!(
        paths,
        vec![
            "crate::net::error::inner::Failure".to_string(),
            "crate::net::error::inner::deeper::Deep".to_string(),
        ]
    );
}

#[test]
fn test_ignore_marker_does_not_annotate() {
    let source = r#"
/// +thaterror:ignore
pub struct Skipped;
"#;
    let specs = parse_source(Path::new(PATH), source, MODULE).expect("source should parse");
    assert!(specs.is_empty());
}

#[test]
fn test_annotation_on_function_is_rejected() {
    let source = r#"
/// +thaterror:error=nope
pub fn helper() {}
"#;
    let err = parse_source(Path::new(PATH), source, MODULE).expect_err("function annotation");
    match err {
        ParseError::NotATypeDeclaration { kind, line, .. } => {
            assert_eq!(kind, "function");
            assert_eq!(line, 2);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_generic_type_is_rejected() {
    let source = r#"
/// +thaterror:error=bad {{.0}}
pub struct Wrapper<T>(T);
"#;
    let err = parse_source(Path::new(PATH), source, MODULE).expect_err("generic type");
    match err {
        ParseError::GenericType { type_name, line, .. } => {
            assert_eq!(type_name, "Wrapper");
            assert_eq!(line, 3);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_directive_errors_carry_location() {
    let source = r#"
/// +thaterror:error:start
/// never closed
pub struct Open;
"#;
    let err = parse_source(Path::new(PATH), source, MODULE).expect_err("unterminated block");
    match &err {
        ParseError::Directive { type_name, line, source, .. } => {
            assert_eq!(type_name, "Open");
            assert_eq!(*line, 4);
            assert_eq!(source, &DirectiveError::UnterminatedTemplate);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().starts_with("src/net/error.rs:4: `Open`:"), "{err}");
}

#[test]
fn test_syntax_error() {
    let err = parse_source(Path::new(PATH), "pub struct {", MODULE).expect_err("bad source");
    assert!(matches!(err, ParseError::Syntax { line: 1, .. }), "{err:?}");
}

#[test]
fn test_malformed_template_is_rejected_while_scanning() {
    let source = r#"
/// +thaterror:error={{if .ok}}yes{{end}}
pub struct Branchy {
    pub ok: bool,
}
"#;
    let err = parse_source(Path::new(PATH), source, MODULE).expect_err("unsupported action");
    match err {
        ParseError::Directive { source: DirectiveError::Template(TemplateError::UnsupportedAction { action }), line, .. } => {
            assert_eq!(action, "if .ok");
            assert_eq!(line, 3);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_generated_code_must_reach_owner_fields() {
    let private_source = r#"
/// +thaterror:transparent
/// +thaterror:wrap=*"std::io".Error
pub struct Io {
    source: super::zz_generated_thaterror::IoWrapUnion,
}
"#;
    let err = parse_source(Path::new(PATH), private_source, MODULE).expect_err("private source");
    assert!(
        matches!(&err, ParseError::Shape { line: 4, source: ShapeError::FieldNotVisible { field, .. }, .. } if field == "source"),
        "{err:?}"
    );
    assert!(err.to_string().contains("not visible from `crate::net`"), "{err}");

    // The generated module sits next to `mod.rs`, inside the owner's module.
    let specs = parse_source(Path::new("src/net/mod.rs"), private_source, "crate::net").expect("mod.rs owner");
    assert_eq!(specs.len(), 1);

    let extra_field = r#"
/// +thaterror:error=request failed
/// +thaterror:wrap="crate::store::error".StoreError
pub struct RequestFailed {
    pub id: u64,
    pub(super) source: super::zz_generated_thaterror::RequestFailedWrapUnion,
}
"#;
    let err = parse_source(Path::new(PATH), extra_field, MODULE).expect_err("extra field");
    assert!(
        matches!(&err, ParseError::Shape { source: ShapeError::ExtraWrapField { field }, .. } if field == "id"),
        "{err:?}"
    );

    let missing_field = r#"
/// +thaterror:error=fetch of {{.url}} failed
pub struct FetchError {
    pub host: String,
}
"#;
    let err = parse_source(Path::new(PATH), missing_field, MODULE).expect_err("unknown field");
    assert!(
        matches!(&err, ParseError::Shape { source: ShapeError::UnknownField { field }, .. } if field == "url"),
        "{err:?}"
    );

    let enum_wrap = r#"
/// +thaterror:wrap=Closed
pub enum Kind {
    A,
}
"#;
    let err = parse_source(Path::new(PATH), enum_wrap, MODULE).expect_err("enum owner");
    assert!(matches!(err, ParseError::Shape { source: ShapeError::EnumOwner { .. }, .. }), "{err:?}");
}

#[test]
fn test_wrapping_owner_with_backtrace() {
    let source = r#"
/// +thaterror:error=request failed
/// +thaterror:wrap="crate::store::error".StoreError
pub struct RequestFailed {
    pub(super) source: super::zz_generated_thaterror::RequestFailedWrapUnion,
    pub backtrace: std::backtrace::Backtrace,
}
"#;
    let specs = parse_source(Path::new(PATH), source, MODULE).expect("source should parse");
    assert!(specs[0].backtrace);
    assert!(specs[0].is_wrapping());
}
