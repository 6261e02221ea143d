use std::fs;
use std::path::Path;

use path::FileFilter;
use tempfile::TempDir;
use thaterror::{generate, lint, GenerationContext};

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("has parent")).expect("mkdir");
    fs::write(path, contents).expect("write");
}

const STORE_ERRORS: &str = r#"
/// +thaterror:error=object {{.0}} not found
#[derive(Debug)]
pub struct NotFound(pub String);

/// +thaterror:transparent
/// +thaterror:wrap=NotFound
/// +thaterror:wrap=*"std::io".Error
#[derive(Debug)]
pub struct StoreError {
    pub(super) source: super::zz_generated_thaterror::StoreErrorWrapUnion,
}
"#;

const API_ERRORS: &str = r#"
/// +thaterror:error:start
/// request failed:
///     {{- .source}}
/// +thaterror:error:end
/// +thaterror:wrap="crate::store::error".StoreError
#[derive(Debug)]
pub struct RequestFailed {
    pub(super) source: super::zz_generated_thaterror::RequestFailedWrapUnion,
    pub backtrace: std::backtrace::Backtrace,
}
"#;

fn generated_filter() -> FileFilter {
    FileFilter::new("**/*.rs", &["**/zz_generated_*.rs".to_string()]).expect("valid patterns")
}

#[test]
fn generated_modules_are_complete_and_pass_the_lint() {
    let tmp = TempDir::new().expect("tempdir");
    write(tmp.path(), "src/store/error.rs", STORE_ERRORS);
    write(tmp.path(), "src/api/error.rs", API_ERRORS);

    let ctx = GenerationContext::builder().root(tmp.path()).build().expect("context");
    let report = generate(&ctx).expect("generate");
    assert_eq!(report.written.len(), 2);

    let store = fs::read_to_string(tmp.path().join("src/store/zz_generated_thaterror.rs")).expect("store");
    assert!(store.contains("pub enum StoreErrorWrapUnion {"));
    assert!(store.contains("Error(::std::boxed::Box<::std::io::Error>),"));
    assert!(store.contains("::std::fmt::Display::fmt(&self.source, f)"));
    assert!(store.contains("pub fn into_api_error_request_failed(self) -> crate::api::error::RequestFailed"));

    let api = fs::read_to_string(tmp.path().join("src/api/zz_generated_thaterror.rs")).expect("api");
    assert!(api.contains("::std::write!(f, \"request failed:{}\\n\", self.source)"));
    assert!(api.contains("Some(self.source.as_error())"));
    assert!(api.contains("backtrace: ::std::backtrace::Backtrace::capture(),"));

    // Generated files are linted too when no skip pattern excludes them.
    let everything = FileFilter::new("**/*.rs", &[]).expect("valid pattern");
    let all = lint(tmp.path(), &everything).expect("generated code passes");
    let sources_only = lint(tmp.path(), &generated_filter()).expect("sources pass");
    assert_eq!(all.files, sources_only.files + 2);
}
