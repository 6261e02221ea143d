// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! thaterror intermediate representation
//!
//! This crate defines the structures that sit between the annotation parser and
//! the code synthesizer: one [`ErrorTypeSpec`] per annotated type declaration,
//! the [`WrapRef`]s it may wrap, and the derived [`UnionDescriptor`] naming the
//! generated closed union.

pub mod error_type;
pub mod naming;
pub mod union;

pub use error_type::*;
pub use union::*;
