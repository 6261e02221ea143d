// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Path utilities for locating the project root, deriving Rust module paths
//! from source paths, naming generated artifacts, and discovering the source
//! files a pass should visit.

pub mod discovery;
pub mod path_utils;

pub use discovery::{compile_patterns, discover, FileFilter};

// Re-export for convenience
pub use path_utils::*;
