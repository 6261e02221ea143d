// SPDX-License-Identifier: Apache-2.0

//! Identifier case conversion shared by the parser and the code synthesizer.

/// Convert a PascalCase or camelCase identifier to snake_case.
///
/// Acronym runs stay together, so `HTTPError` becomes `http_error`.
///
/// # Examples
/// ```
/// use thaterror_ir::naming::to_snake_case;
/// assert_eq!(to_snake_case("ReadTimeout"), "read_timeout");
/// assert_eq!(to_snake_case("HTTPError"), "http_error");
/// assert_eq!(to_snake_case("already_snake"), "already_snake");
/// ```
pub fn to_snake_case(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut result = String::with_capacity(input.len() + 4);

    for (i, c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev != '_'
                && (prev.is_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_uppercase() && next_is_lower))
            {
                result.push('_');
            }
        }
        result.extend(c.to_lowercase());
    }

    result
}

/// Convert snake_case (or any `_`/`::` separated words) to PascalCase.
pub fn to_pascal_case(input: &str) -> String {
    input
        .split(|c: char| c == '_' || c == ':')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect()
}

/// Capitalize the first letter of a string
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Whether `name` is a plain (non-raw) Rust identifier.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {
            name != "_" && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    }
}
