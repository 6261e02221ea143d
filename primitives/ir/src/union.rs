// SPDX-License-Identifier: Apache-2.0

//! Closed-union naming.
//!
//! A wrapping error type holds exactly one value drawn from its declared
//! [`WrapRef`] set. The generated union enum and the per-member conversion
//! method are named here, as pure functions of the owning spec, so that code
//! emitted into different artifacts agrees on the names.

use serde::{Deserialize, Serialize};

use crate::naming::{to_pascal_case, to_snake_case};
use crate::{ErrorTypeSpec, WrapRef};

/// Suffix appended to the owning type name to name its union enum.
pub const UNION_SUFFIX: &str = "WrapUnion";

/// Derived names for the closed union of one wrapping error type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnionDescriptor {
    /// Name of the generated union enum, e.g. `FetchErrorWrapUnion`.
    pub union_name: String,
    /// Name of the conversion method attached to every member type, e.g.
    /// `into_net_error_fetch_error`.
    pub marker_method: String,
}

impl UnionDescriptor {
    /// Derive the descriptor for `spec`.
    pub fn for_spec(spec: &ErrorTypeSpec) -> Self {
        Self {
            union_name: union_name(&spec.type_name),
            marker_method: marker_method_name(&spec.module_path, &spec.type_name),
        }
    }
}

/// Name of the union enum generated for `type_name`.
pub fn union_name(type_name: &str) -> String { format!("{type_name}{UNION_SUFFIX}") }

/// Name of the conversion method minted for a type declared in `module_path`.
///
/// The module path is derived from the declaring source path, so two types
/// sharing a name in different directories receive distinct method names.
/// Segments are joined with `_`, so `crate::a::b` and `crate::a_b` flatten
/// alike; generation rejects owners that collide on one member.
///
/// # Examples
/// ```
/// use thaterror_ir::marker_method_name;
/// assert_eq!(marker_method_name("crate::net::error", "FetchError"), "into_net_error_fetch_error");
/// assert_eq!(marker_method_name("crate", "Error"), "into_error");
/// ```
pub fn marker_method_name(module_path: &str, type_name: &str) -> String {
    let mut name = String::from("into");
    for segment in module_path.split("::").filter(|s| !s.is_empty() && *s != "crate") {
        name.push('_');
        name.push_str(&to_snake_case(segment.trim_start_matches("r#")));
    }
    name.push('_');
    name.push_str(&to_snake_case(type_name));
    name
}

/// Variant names for the members of a union, in declaration order.
///
/// A member is named after its type. When several members share a type name,
/// each of them is named after its full path instead.
pub fn variant_names(owner_module: &str, members: &[WrapRef]) -> Vec<String> {
    members
        .iter()
        .map(|member| {
            let shared =
                members.iter().filter(|other| other.type_name == member.type_name).count() > 1;
            if shared {
                to_pascal_case(&member.type_path(owner_module))
            } else {
                member.type_name.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_descriptor() {
        let spec = ErrorTypeSpec::new("FetchError", "src/net/error.rs", "crate::net::error");
        let descriptor = UnionDescriptor::for_spec(&spec);
        assert_eq!(descriptor.union_name, "FetchErrorWrapUnion");
        assert_eq!(descriptor.marker_method, "into_net_error_fetch_error");
    }

    #[test]
    fn test_marker_method_distinguishes_directories() {
        assert_ne!(
            marker_method_name("crate::a::error", "Error"),
            marker_method_name("crate::b::error", "Error")
        );
    }

    #[test]
    fn test_variant_names() {
        let members = vec![
            WrapRef::local("Parse"),
            WrapRef::qualified("crate::net::error", "Timeout"),
            WrapRef::qualified("crate::disk::error", "Timeout").boxed(),
        ];
        assert_eq!(
            variant_names("crate::error", &members),
            vec!["Parse", "CrateNetErrorTimeout", "CrateDiskErrorTimeout"]
        );
    }
}
