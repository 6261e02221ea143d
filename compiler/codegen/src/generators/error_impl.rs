// SPDX-License-Identifier: Apache-2.0

use std::fmt::Write as _;

use ir::{ErrorTypeSpec, Mode};
use parser::template::CompiledTemplate;

use super::{DISPLAY, ERROR, FMT_RESULT, FORMATTER, SOURCE_RESULT};
use crate::Result;

/// Inherent `ERROR_TEMPLATE` constant holding the raw template.
pub fn emit_template_const(spec: &ErrorTypeSpec, template: &str) -> Result<String> {
    let mut code = String::new();
    writeln!(code, "impl {} {{", spec.type_path())?;
    writeln!(code, "    /// Message template of this error.")?;
    writeln!(code, "    pub const ERROR_TEMPLATE: &'static str = {template:?};")?;
    writeln!(code, "}}")?;
    Ok(code)
}

/// `Display` rendering the compiled template, or delegating to `self.source`
/// when `compiled` is `None` (transparent mode).
pub fn emit_display_impl(spec: &ErrorTypeSpec, compiled: Option<&CompiledTemplate>) -> Result<String> {
    let (formatter, body) = match compiled {
        Some(template) if template.is_empty() => ("_f", template.render_body()),
        Some(template) => ("f", template.render_body()),
        None => ("f", format!("{DISPLAY}::fmt(&self.source, f)")),
    };

    let mut code = String::new();
    writeln!(code, "impl {DISPLAY} for {} {{", spec.type_path())?;
    writeln!(code, "    fn fmt(&self, {formatter}: &mut {FORMATTER}) -> {FMT_RESULT} {{")?;
    writeln!(code, "        {body}")?;
    writeln!(code, "    }}")?;
    writeln!(code, "}}")?;
    Ok(code)
}

/// `Error` impl whose `source` exposes the held value.
pub fn emit_error_impl(spec: &ErrorTypeSpec) -> Result<String> {
    let body = match (&spec.mode, spec.is_wrapping()) {
        (Mode::Transparent, _) => format!("{ERROR}::source(&self.source)"),
        (Mode::Template(_), true) => "::std::option::Option::Some(self.source.as_error())".to_string(),
        (Mode::Template(_), false) => "::std::option::Option::None".to_string(),
    };

    let mut code = String::new();
    writeln!(code, "impl {ERROR} for {} {{", spec.type_path())?;
    writeln!(code, "    fn source(&self) -> {SOURCE_RESULT} {{")?;
    writeln!(code, "        {body}")?;
    writeln!(code, "    }}")?;
    writeln!(code, "}}")?;
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parser::template::TemplateCompiler;

    fn spec(mode: Mode) -> ErrorTypeSpec {
        let mut spec = ErrorTypeSpec::new("Closed", "src/net/error.rs", "crate::net::error");
        spec.mode = mode;
        spec
    }

    #[test]
    fn test_template_const_escapes_raw_text() {
        let code = emit_template_const(&spec(Mode::default()), "say \"{{.x}}\"\n").expect("emit");
        assert!(code.contains(r#"pub const ERROR_TEMPLATE: &'static str = "say \"{{.x}}\"\n";"#), "{code}");
    }

    #[test]
    fn test_display_for_empty_template_ignores_formatter() {
        let compiled = TemplateCompiler::new().expect("pattern").compile("").expect("valid");
        let code = emit_display_impl(&spec(Mode::default()), Some(&compiled)).expect("emit");
        assert!(code.contains("fn fmt(&self, _f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {"));
        assert!(code.contains("        Ok(())\n"));
    }

    #[test]
    fn test_transparent_display_delegates() {
        let code = emit_display_impl(&spec(Mode::Transparent), None).expect("emit");
        assert!(code.contains("::std::fmt::Display::fmt(&self.source, f)"), "{code}");
    }

    #[test]
    fn test_error_source_per_mode() {
        let code = emit_error_impl(&spec(Mode::default())).expect("emit");
        assert!(code.starts_with("impl ::std::error::Error for crate::net::error::Closed {"));
        assert!(code.contains("::std::option::Option::None"));

        let code = emit_error_impl(&spec(Mode::Transparent)).expect("emit");
        assert!(code.contains("::std::error::Error::source(&self.source)"));

        let mut wrapping = spec(Mode::default());
        wrapping.wrap_from.push(ir::WrapRef::local("Inner"));
        let code = emit_error_impl(&wrapping).expect("emit");
        assert!(code.contains("::std::option::Option::Some(self.source.as_error())"));
    }
}
