// SPDX-License-Identifier: Apache-2.0

use std::fmt::Write as _;

use ir::{variant_names, ErrorTypeSpec, UnionDescriptor, WrapRef};

use super::{DISPLAY, ERROR, FMT_RESULT, FORMATTER, SOURCE_RESULT};
use crate::{CodegenError, Result};

/// One member of a closed union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionMember {
    /// Reference as declared.
    pub wrap_ref: WrapRef,
    /// Enum variant holding this member.
    pub variant: String,
    /// Absolute path of the member type.
    pub type_path: String,
}

impl UnionMember {
    /// Type stored in the variant.
    pub fn stored_type(&self) -> String {
        if self.wrap_ref.is_pointer {
            format!("::std::boxed::Box<{}>", self.type_path)
        } else {
            self.type_path.clone()
        }
    }
}

/// Resolve the members of `spec`'s union, rejecting refs that name the same type twice.
pub fn union_members(spec: &ErrorTypeSpec) -> Result<Vec<UnionMember>> {
    let variants = variant_names(&spec.module_path, &spec.wrap_from);
    let mut members: Vec<UnionMember> = Vec::with_capacity(spec.wrap_from.len());

    for (wrap_ref, variant) in spec.wrap_from.iter().zip(variants) {
        let type_path = absolute_type_path(wrap_ref, &spec.module_path);
        if members.iter().any(|member| member.type_path == type_path) {
            return Err(CodegenError::DuplicateWrapRef {
                type_name: spec.type_path(),
                wrap_ref: wrap_ref.to_string(),
            });
        }
        members.push(UnionMember { wrap_ref: wrap_ref.clone(), variant, type_path });
    }
    Ok(members)
}

/// Absolute path of the referenced type as it must be spelled in generated code.
fn absolute_type_path(wrap_ref: &WrapRef, owner_module: &str) -> String {
    let path = wrap_ref.type_path(owner_module);
    if wrap_ref.is_crate_local() {
        path
    } else {
        format!("::{path}")
    }
}

/// The union enum with its `Display` and `Error` impls and `as_error` accessor.
pub fn emit_union_enum(
    spec: &ErrorTypeSpec,
    descriptor: &UnionDescriptor,
    members: &[UnionMember],
) -> Result<String> {
    let union = &descriptor.union_name;
    let mut code = String::new();

    writeln!(code, "/// Errors that [`{}`] can wrap.", spec.type_path())?;
    writeln!(code, "#[derive(Debug)]")?;
    writeln!(code, "pub enum {union} {{")?;
    for member in members {
        writeln!(code, "    /// Wraps [`{}`].", member.type_path)?;
        writeln!(code, "    {}({}),", member.variant, member.stored_type())?;
    }
    writeln!(code, "}}")?;
    writeln!(code)?;

    writeln!(code, "impl {union} {{")?;
    writeln!(code, "    /// The held error.")?;
    writeln!(code, "    ///")?;
    writeln!(code, "    /// +thaterror:ignore")?;
    writeln!(code, "    pub fn as_error(&self) -> &(dyn {ERROR} + 'static) {{")?;
    writeln!(code, "        match self {{")?;
    for member in members {
        let held = if member.wrap_ref.is_pointer { "&**inner" } else { "inner" };
        writeln!(code, "            Self::{}(inner) => {held},", member.variant)?;
    }
    writeln!(code, "        }}")?;
    writeln!(code, "    }}")?;
    writeln!(code, "}}")?;
    writeln!(code)?;

    writeln!(code, "impl {DISPLAY} for {union} {{")?;
    writeln!(code, "    fn fmt(&self, f: &mut {FORMATTER}) -> {FMT_RESULT} {{")?;
    writeln!(code, "        match self {{")?;
    for member in members {
        writeln!(code, "            Self::{}(inner) => {DISPLAY}::fmt(inner, f),", member.variant)?;
    }
    writeln!(code, "        }}")?;
    writeln!(code, "    }}")?;
    writeln!(code, "}}")?;
    writeln!(code)?;

    writeln!(code, "impl {ERROR} for {union} {{")?;
    writeln!(code, "    fn source(&self) -> {SOURCE_RESULT} {{")?;
    writeln!(code, "        {ERROR}::source(self.as_error())")?;
    writeln!(code, "    }}")?;
    writeln!(code, "}}")?;
    Ok(code)
}

/// `From<member>` for the union, building the member's variant.
pub fn emit_union_from(descriptor: &UnionDescriptor, member: &UnionMember) -> Result<String> {
    let value = if member.wrap_ref.is_pointer {
        "::std::boxed::Box::new(value)"
    } else {
        "value"
    };

    let mut code = String::new();
    writeln!(code, "impl ::std::convert::From<{}> for {} {{", member.type_path, descriptor.union_name)?;
    writeln!(code, "    fn from(value: {}) -> Self {{", member.type_path)?;
    writeln!(code, "        Self::{}({value})", member.variant)?;
    writeln!(code, "    }}")?;
    writeln!(code, "}}")?;
    Ok(code)
}

/// `wrap` constructor and `wrapped` accessor on the owning type.
///
/// The owner holds its union in a field named `source`, and optionally a
/// `backtrace` captured here.
pub fn emit_wrap_accessors(spec: &ErrorTypeSpec, descriptor: &UnionDescriptor) -> Result<String> {
    let union = &descriptor.union_name;
    let mut code = String::new();
    writeln!(code, "impl {} {{", spec.type_path())?;
    writeln!(code, "    /// Wrap any member of [`{union}`].")?;
    writeln!(code, "    pub fn wrap(err: impl ::std::convert::Into<{union}>) -> Self {{")?;
    if spec.backtrace {
        writeln!(code, "        Self {{")?;
        writeln!(code, "            source: err.into(),")?;
        writeln!(code, "            backtrace: ::std::backtrace::Backtrace::capture(),")?;
        writeln!(code, "        }}")?;
    } else {
        writeln!(code, "        Self {{ source: err.into() }}")?;
    }
    writeln!(code, "    }}")?;
    writeln!(code)?;
    writeln!(code, "    /// The wrapped error.")?;
    writeln!(code, "    pub fn wrapped(&self) -> &{union} {{")?;
    writeln!(code, "        &self.source")?;
    writeln!(code, "    }}")?;
    writeln!(code, "}}")?;
    Ok(code)
}

/// Stub attached to a member type: `From<member>` for the owner and, for
/// members declared in this crate, the inherent conversion method.
pub fn emit_member_stub(
    spec: &ErrorTypeSpec,
    descriptor: &UnionDescriptor,
    member: &UnionMember,
) -> Result<String> {
    let owner = spec.type_path();
    let mut code = String::new();

    writeln!(code, "impl ::std::convert::From<{}> for {owner} {{", member.type_path)?;
    writeln!(code, "    fn from(value: {}) -> Self {{", member.type_path)?;
    writeln!(code, "        Self::wrap(value)")?;
    writeln!(code, "    }}")?;
    writeln!(code, "}}")?;

    if member.wrap_ref.is_crate_local() {
        writeln!(code)?;
        writeln!(code, "impl {} {{", member.type_path)?;
        writeln!(code, "    /// Wrap this error into [`{owner}`].")?;
        writeln!(code, "    pub fn {}(self) -> {owner} {{", descriptor.marker_method)?;
        writeln!(code, "        {owner}::wrap(self)")?;
        writeln!(code, "    }}")?;
        writeln!(code, "}}")?;
    }
    Ok(code)
}
