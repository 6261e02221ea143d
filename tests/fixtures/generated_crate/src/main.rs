#![allow(dead_code)]

mod api;
mod error;
mod store;
mod zz_generated_thaterror;

use std::error::Error as _;

use api::error::RequestFailed;
use error::{Silent, Tmpl};
use store::error::{NotFound, StoreError};

fn main() {
    let tmpl = Tmpl { field: "X".to_string() };
    assert_eq!(tmpl.to_string(), "field=X");
    assert_eq!(Tmpl::ERROR_TEMPLATE, "field={{.field}}");
    assert!(tmpl.source().is_none());

    assert_eq!(Silent.to_string(), "");
    assert!(Silent.source().is_none());

    let store = StoreError::from(NotFound("k".to_string()));
    assert_eq!(store.to_string(), "object k not found");
    assert!(store.source().is_none());

    let io = StoreError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk gone"));
    assert_eq!(io.to_string(), "disk gone");

    let failed = RequestFailed::wrap(store);
    assert_eq!(failed.to_string(), "request failed\ncaused by object k not found\n");
    let cause = failed.source().expect("wrapped error is the source");
    assert_eq!(cause.to_string(), "object k not found");
    assert_eq!(failed.wrapped().to_string(), "object k not found");
    let _ = failed.backtrace.status();

    let converted: RequestFailed =
        NotFound("q".to_string()).into_store_error_store_error().into_api_error_request_failed();
    assert_eq!(converted.source().map(ToString::to_string).as_deref(), Some("object q not found"));

    let from_io = RequestFailed::from(io);
    assert_eq!(from_io.to_string(), "request failed\ncaused by disk gone\n");

    println!("generated crate ok");
}
