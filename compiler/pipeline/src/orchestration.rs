// SPDX-License-Identifier: Apache-2.0

//! Pipeline orchestration for the main entry points.
//!
//! Files are processed strictly in discovery order and items in source order.
//! Nothing is written until every file has been parsed and synthesized, so a
//! failure anywhere leaves the tree untouched.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use codegen::Synthesizer;
use ir::{ErrorTypeSpec, UnionDescriptor};
use path::{discover, module_path_for_file, ArtifactKey};
use tracing::{debug, info};

use crate::generation_context::GenerationContext;
use crate::render_session::{FlushReport, RenderSession};
use crate::{PipelineError, Result};

/// Scan every selected file and return the specs of all annotated types.
pub fn collect_specs(ctx: &GenerationContext) -> Result<Vec<ErrorTypeSpec>> {
    let mut specs = Vec::new();
    let mut names: BTreeMap<ArtifactKey, BTreeSet<String>> = BTreeMap::new();

    for file in discover(&ctx.root, &ctx.src_root, &ctx.filter)? {
        info!(path = %file.display(), "iterating file");
        for spec in parse_file(&ctx.src_root, &file)? {
            let artifact = ArtifactKey::for_source(&spec.source_path);
            if !names.entry(artifact.clone()).or_default().insert(spec.type_name.clone()) {
                return Err(PipelineError::DuplicateTypeName {
                    type_name: spec.type_name,
                    artifact: artifact.to_string(),
                });
            }
            specs.push(spec);
        }
    }
    check_marker_methods(&specs)?;
    Ok(specs)
}

/// Each crate-local member gets one inherent method per owner; owners whose
/// module and type names flatten to the same method name cannot share one.
fn check_marker_methods(specs: &[ErrorTypeSpec]) -> Result<()> {
    let mut minted: BTreeMap<(String, String), String> = BTreeMap::new();
    for spec in specs.iter().filter(|spec| spec.is_wrapping()) {
        let method = UnionDescriptor::for_spec(spec).marker_method;
        let owner = spec.type_path();
        for wrap_ref in spec.wrap_from.iter().filter(|r| r.is_crate_local()) {
            let member = wrap_ref.type_path(&spec.module_path);
            let first = minted.entry((member.clone(), method.clone())).or_insert_with(|| owner.clone());
            if *first != owner {
                return Err(PipelineError::MarkerMethodCollision {
                    member,
                    method,
                    first: first.clone(),
                    second: owner,
                });
            }
        }
    }
    Ok(())
}

/// Run a full generation: scan, synthesize, then write every artifact.
pub fn generate(ctx: &GenerationContext) -> Result<FlushReport> {
    let specs = collect_specs(ctx)?;
    let synthesizer = Synthesizer::new(&ctx.src_root)?;
    let mut session = RenderSession::new(ctx.output_file_name.clone());

    for spec in &specs {
        synthesizer.synthesize(spec, &mut session)?;
    }

    let report = session.flush(ctx.rustfmt)?;
    info!(types = specs.len(), files = report.written.len(), "generation finished");
    Ok(report)
}

/// Collected specs as pretty-printed JSON.
pub fn specs_to_json(specs: &[ErrorTypeSpec]) -> Result<String> {
    Ok(serde_json::to_string_pretty(specs)?)
}

fn parse_file(src_root: &Path, file: &Path) -> Result<Vec<ErrorTypeSpec>> {
    let source = fs::read_to_string(file)
        .map_err(|source| PipelineError::Read { path: file.to_path_buf(), source })?;
    let module_path = module_path_for_file(src_root, file)?;
    let specs = parser::parse_source(file, &source, &module_path)?;
    debug!(path = %file.display(), module = %module_path, count = specs.len(), "parsed");
    Ok(specs)
}
