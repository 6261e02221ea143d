// SPDX-License-Identifier: Apache-2.0

//! Error type specifications
//!
//! An [`ErrorTypeSpec`] is the structured description of how one annotated type
//! implements the error contract. It is immutable once built by the parser.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// How the message of an error type is produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum Mode {
    /// Render the message from a template over the receiver's own fields.
    Template(String),
    /// Delegate the message to the held inner value.
    Transparent,
}

impl Default for Mode {
    fn default() -> Self { Mode::Template(String::new()) }
}

impl Mode {
    /// Returns `true` for [`Mode::Transparent`].
    pub fn is_transparent(&self) -> bool { matches!(self, Mode::Transparent) }
}

/// A reference to a type that an error type may wrap.
///
/// Identity is structural: two refs are equal iff origin, name and pointer flag
/// all match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WrapRef {
    /// Module path declaring the referenced type; `None` means the owning
    /// type's own module.
    pub origin: Option<String>,
    /// Name of the referenced type.
    pub type_name: String,
    /// Whether the wrapped value is held behind a pointer (`Box`).
    pub is_pointer: bool,
}

impl WrapRef {
    /// Create a ref to a type in the owning module.
    pub fn local(type_name: impl Into<String>) -> Self {
        Self { origin: None, type_name: type_name.into(), is_pointer: false }
    }

    /// Create a ref to a type declared in `origin`.
    pub fn qualified(origin: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self { origin: Some(origin.into()), type_name: type_name.into(), is_pointer: false }
    }

    /// Mark this ref as held behind a pointer.
    pub fn boxed(mut self) -> Self {
        self.is_pointer = true;
        self
    }

    /// Absolute path of the referenced type, resolving a missing origin
    /// against `owner_module`.
    pub fn type_path(&self, owner_module: &str) -> String {
        let module = self.origin.as_deref().unwrap_or(owner_module);
        format!("{}::{}", module, self.type_name)
    }

    /// Whether the referenced type lives inside the crate being generated.
    pub fn is_crate_local(&self) -> bool {
        match &self.origin {
            None => true,
            Some(origin) => origin == "crate" || origin.starts_with("crate::"),
        }
    }
}

impl fmt::Display for WrapRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_pointer {
            f.write_str("*")?;
        }
        match &self.origin {
            Some(origin) => write!(f, "\"{}\".{}", origin, self.type_name),
            None => f.write_str(&self.type_name),
        }
    }
}

/// The structured description of one annotated error type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorTypeSpec {
    /// Name of the annotated type, unique within its artifact.
    pub type_name: String,
    /// Path of the source file declaring the type, as discovered.
    pub source_path: PathBuf,
    /// Rust module path of the declaring module (e.g. `crate::net::error`).
    pub module_path: String,
    /// Message mode.
    pub mode: Mode,
    /// Types this error may wrap, in declaration order.
    pub wrap_from: Vec<WrapRef>,
    /// Whether a wrapping type declares a `backtrace: Backtrace` field,
    /// captured when the type is built by `wrap`.
    #[serde(default)]
    pub backtrace: bool,
}

impl ErrorTypeSpec {
    /// Create a spec with the default mode and no wrap refs.
    pub fn new(
        type_name: impl Into<String>,
        source_path: impl Into<PathBuf>,
        module_path: impl Into<String>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            source_path: source_path.into(),
            module_path: module_path.into(),
            mode: Mode::default(),
            wrap_from: Vec::new(),
            backtrace: false,
        }
    }

    /// Absolute path of the annotated type.
    pub fn type_path(&self) -> String { format!("{}::{}", self.module_path, self.type_name) }

    /// Whether this type wraps a closed set of other errors.
    pub fn is_wrapping(&self) -> bool { !self.wrap_from.is_empty() }
}
