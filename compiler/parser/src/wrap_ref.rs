// SPDX-License-Identifier: Apache-2.0

//! Resolution of `+thaterror:wrap=` payloads into [`WrapRef`]s.
//!
//! Accepted forms:
//!
//! - `Inner` / `*Inner`: a type in the owning module
//! - `"crate::net::error".Timeout` / `*"std::io".Error`: a type in another module
//!
//! Resolution is textual. Whether the referenced type exists is not checked.

use ir::naming::is_identifier;
use ir::WrapRef;

use crate::DirectiveError;

/// Resolve one wrap-from payload.
pub fn resolve_wrap_ref(payload: &str) -> Result<WrapRef, DirectiveError> {
    let unresolvable =
        |reason: &'static str| DirectiveError::UnresolvableWrapRef { payload: payload.to_string(), reason };

    let text = payload.trim();
    let (is_pointer, text) = match text.strip_prefix('*') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, text),
    };

    let (origin, type_name) = match text.strip_prefix('"') {
        Some(quoted) => {
            let (origin, rest) =
                quoted.split_once('"').ok_or_else(|| unresolvable("unterminated module path"))?;
            let type_name = rest
                .strip_prefix('.')
                .ok_or_else(|| unresolvable("expected `.` between module path and type name"))?;
            (Some(resolve_origin(origin).map_err(unresolvable)?), type_name)
        }
        None => (None, text),
    };

    if type_name.is_empty() {
        return Err(unresolvable("missing type name"));
    }
    if !is_identifier(type_name) {
        return Err(unresolvable("type name is not an identifier"));
    }

    Ok(WrapRef { origin, type_name: type_name.to_string(), is_pointer })
}

fn resolve_origin(origin: &str) -> Result<String, &'static str> {
    let origin = origin.trim().trim_start_matches("::");
    if origin.is_empty() {
        return Err("empty module path");
    }

    let segments: Vec<&str> = origin.split("::").collect();
    if matches!(segments[0], "self" | "super" | "Self") {
        return Err("module path must be absolute (`crate::…` or an external crate)");
    }
    for segment in &segments {
        let bare = segment.strip_prefix("r#").unwrap_or(segment);
        if !is_identifier(bare) {
            return Err("module path segment is not an identifier");
        }
    }
    if segments[1..].iter().any(|s| matches!(*s, "crate" | "self" | "super")) {
        return Err("path keywords may only lead a module path");
    }

    Ok(segments.join("::"))
}
