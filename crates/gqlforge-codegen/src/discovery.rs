//! Auto-discovery of types that were not annotated.
//!
//! - `referenced`: breadth-first from every artifact through its visible
//!   fields. Structs reached from a type get a type artifact, structs
//!   reached from an input get an input artifact. Depth is counted in
//!   hops from the seed; `max_depth = 0` means unlimited.
//! - `all`: every non-generic struct gets a type artifact, then the
//!   referenced walk runs.
//! - `patterns`: structs whose Go name matches a glob get a type artifact.

use crate::ir::{ArtifactKind, ArtifactSpec, TypeShape};
use crate::registry::{Registry, TypeId};
use crate::resolver::{artifact_name, artifact_target};
use glob::Pattern;
use gqlforge_core::{DiscoveryStrategy, GenError, GenResult, GeneratorConfig};
use std::collections::VecDeque;
use tracing::debug;

/// Compile discovery globs
pub fn compile_patterns(patterns: &[String]) -> GenResult<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| {
                GenError::Config(format!("invalid auto_discovery pattern `{p}`: {e}"))
            })
        })
        .collect()
}

/// Add discovered artifacts according to the configured strategy
pub fn discover(registry: &mut Registry, config: &GeneratorConfig) -> GenResult<()> {
    match config.auto_discovery.strategy {
        DiscoveryStrategy::None => Ok(()),
        DiscoveryStrategy::Referenced => {
            walk(registry, config);
            Ok(())
        }
        DiscoveryStrategy::All => {
            for id in candidates(registry) {
                add_artifact(registry, id, ArtifactKind::Type, 0);
            }
            walk(registry, config);
            Ok(())
        }
        DiscoveryStrategy::Patterns => {
            let patterns = compile_patterns(&config.auto_discovery.patterns)?;
            for id in candidates(registry) {
                let name = &registry.get(id).name;
                if patterns.iter().any(|p| p.matches(name)) {
                    add_artifact(registry, id, ArtifactKind::Type, 0);
                }
            }
            Ok(())
        }
    }
}

/// Non-generic structs
fn candidates(registry: &Registry) -> Vec<TypeId> {
    registry
        .ids()
        .filter(|&id| {
            let record = registry.get(id);
            record.is_struct() && !record.is_generic()
        })
        .collect()
}

/// Add a discovered artifact unless one of that kind exists; returns its index
fn add_artifact(
    registry: &mut Registry,
    id: TypeId,
    kind: ArtifactKind,
    depth: usize,
) -> Option<usize> {
    let record = registry.get_mut(id);
    if record.has_artifact(kind) {
        return None;
    }
    record.artifacts.push(ArtifactSpec::discovered(kind));
    debug!(name = %record.name, kind = %kind, depth, "discovered artifact");
    Some(record.artifacts.len() - 1)
}

fn walk(registry: &mut Registry, config: &GeneratorConfig) {
    let max_depth = config.auto_discovery.max_depth;
    let mut queue: VecDeque<(TypeId, usize, usize)> = VecDeque::new();

    for id in candidates(registry) {
        for index in 0..registry.get(id).artifacts.len() {
            queue.push_back((id, index, 0));
        }
    }

    while let Some((id, index, depth)) = queue.pop_front() {
        if max_depth != 0 && depth + 1 > max_depth {
            continue;
        }

        let (kind, referenced) = referenced_structs(registry, id, index, config);
        for target in referenced {
            if let Some(new_index) = add_artifact(registry, target, kind, depth + 1) {
                queue.push_back((target, new_index, depth + 1));
            }
        }
    }
}

/// Structs referenced by the visible fields of one artifact
fn referenced_structs(
    registry: &Registry,
    id: TypeId,
    index: usize,
    config: &GeneratorConfig,
) -> (ArtifactKind, Vec<TypeId>) {
    let record = registry.get(id);
    let spec = &record.artifacts[index];
    let TypeShape::Struct(fields) = &record.shape else {
        return (spec.kind, Vec::new());
    };

    let name = artifact_name(record, spec, &config.naming);
    let target = artifact_target(record, spec, &name);
    let ignore_all = spec.ignore_all || record.ignore_all;

    let referenced = fields
        .iter()
        .filter(|f| f.options.type_override.is_none() && f.visible_in(&target, ignore_all))
        .filter_map(|f| registry.resolve(f.ty.element()))
        .filter(|&r| {
            let referenced = registry.get(r);
            referenced.is_struct() && !referenced.is_generic()
        })
        .collect();

    (spec.kind, referenced)
}
