// SPDX-License-Identifier: Apache-2.0

//! Item emitters.
//!
//! Every emitter returns complete Rust items as source text. Generated code
//! names every type by its absolute path so an item compiles regardless of
//! which artifact module it lands in.

/// Sub-module generates: **`error_impl`**
///
/// `ERROR_TEMPLATE`, `Display` and `Error` implementations for one annotated type.
pub mod error_impl;

/// Sub-module generates: **`union`**
///
/// The closed union enum of a wrapping type, its conversions and the stubs
/// attached to every member type.
pub mod union;

pub(crate) const DISPLAY: &str = "::std::fmt::Display";
pub(crate) const ERROR: &str = "::std::error::Error";
pub(crate) const FORMATTER: &str = "::std::fmt::Formatter<'_>";
pub(crate) const FMT_RESULT: &str = "::std::fmt::Result";
pub(crate) const SOURCE_RESULT: &str = "::std::option::Option<&(dyn ::std::error::Error + 'static)>";
