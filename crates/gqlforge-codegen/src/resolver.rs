//! Cross-type resolution and lowering to schema blocks.
//!
//! Runs in fixed phases over the closed [`Registry`]:
//!
//! 1. named and alias types over structs take the struct's fields
//! 2. enum constants are linked to their `@gqlEnum` type
//! 3. embedded structs are flattened into their owners
//! 4. generic references are instantiated into concrete structs
//! 5. auto-discovery adds artifacts to unannotated types
//! 6. every artifact is lowered into a [`SchemaBlock`]
//!
//! Every phase fails fast; nothing is downgraded to a warning except an
//! artifact with no visible fields, which is skipped.

use crate::annotate::Annotated;
use crate::discovery::discover;
use crate::enums::{EnumValues, is_enum_capable, link_enums};
use crate::ir::{
    ArtifactKind, ArtifactSpec, ArtifactTarget, BlockField, FieldRecord, Nullability,
    SchemaBlock, TypeExpr, TypeRecord, TypeShape,
};
use crate::naming::{derive_type_name, generic_fragment, resolve_field_name};
use crate::registry::{Registry, TypeId};
use gqlforge_core::{GenError, GenResult, GeneratorConfig, NamingConfig};
use once_cell::sync::Lazy;
use std::collections::{HashMap, VecDeque};
use tracing::{debug, warn};

/// Maximum embedding chain length
pub const MAX_EMBED_DEPTH: usize = 32;

/// Scalars used when the configuration does not map a key
static DEFAULT_SCALARS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([("time.Time", "Time"), ("map", "Map"), ("any", "Any")])
});

/// Resolve annotated declarations into schema blocks, in declaration order
pub fn resolve(annotated: Annotated, config: &GeneratorConfig) -> GenResult<Vec<SchemaBlock>> {
    let mut registry = Registry::build(annotated);

    normalize_shapes(&mut registry)?;
    let enums = link_enums(&registry)?;
    expand_embeddings(&mut registry)?;
    instantiate_generics(&mut registry);
    discover(&mut registry, config)?;

    Lowering {
        registry: &registry,
        enums: &enums,
        config,
    }
    .blocks()
}

/// Final name of one artifact of a record
pub(crate) fn artifact_name(record: &TypeRecord, spec: &ArtifactSpec, naming: &NamingConfig) -> String {
    derive_type_name(&record.name, spec.custom_name.as_deref(), spec.kind, naming)
}

pub(crate) fn artifact_target<'a>(
    record: &'a TypeRecord,
    spec: &'a ArtifactSpec,
    final_name: &'a str,
) -> ArtifactTarget<'a> {
    ArtifactTarget {
        kind: spec.kind,
        final_name,
        custom_name: spec.custom_name.as_deref(),
        go_name: &record.name,
    }
}

fn substitute_fields(fields: &[FieldRecord], params: &[String], args: &[TypeExpr]) -> Vec<FieldRecord> {
    fields
        .iter()
        .map(|f| FieldRecord {
            ty: f.ty.substitute(params, args),
            ..f.clone()
        })
        .collect()
}

fn type_args(ty: &TypeExpr) -> &[TypeExpr] {
    match ty.pointee() {
        TypeExpr::Named { args, .. } => args,
        _ => &[],
    }
}

// ============================================================================
// Shapes
// ============================================================================

fn normalize_shapes(registry: &mut Registry) -> GenResult<()> {
    for id in registry.ids() {
        if !registry.get(id).is_struct() {
            let mut chain = Vec::new();
            if let Some(fields) = underlying_struct(registry, id, &mut chain) {
                registry.get_mut(id).shape = TypeShape::Struct(fields);
            }
        }

        let record = registry.get(id);
        if let Some(spec) = record.artifacts.first()
            && !record.is_struct()
        {
            let directive = match spec.kind {
                ArtifactKind::Input => "@gqlInput",
                _ => "@gqlType",
            };
            return Err(GenError::Directive {
                path: record.path.clone(),
                owner: record.name.clone(),
                directive: directive.to_string(),
                message: "requires a struct type".to_string(),
            });
        }
        if record.enum_spec.is_some() && !is_enum_capable(&record.shape) {
            return Err(GenError::Directive {
                path: record.path.clone(),
                owner: record.name.clone(),
                directive: "@gqlEnum".to_string(),
                message: "requires a named non-struct type".to_string(),
            });
        }
    }
    Ok(())
}

/// Fields a named or alias type takes from the struct it names
fn underlying_struct(registry: &Registry, id: TypeId, chain: &mut Vec<TypeId>) -> Option<Vec<FieldRecord>> {
    if chain.contains(&id) || chain.len() > MAX_EMBED_DEPTH {
        return None;
    }
    chain.push(id);

    let ty = match &registry.get(id).shape {
        TypeShape::Struct(fields) => return Some(fields.clone()),
        TypeShape::Named(ty) | TypeShape::Alias(ty) => ty,
    };
    if !matches!(ty, TypeExpr::Named { .. }) {
        return None;
    }

    let target = registry.resolve(ty)?;
    let fields = underlying_struct(registry, target, chain)?;
    Some(substitute_fields(&fields, &registry.get(target).type_params, type_args(ty)))
}

// ============================================================================
// Embedding
// ============================================================================

fn expand_embeddings(registry: &mut Registry) -> GenResult<()> {
    let mut memo = HashMap::new();
    for id in registry.ids() {
        if registry.get(id).is_struct() {
            expand(registry, id, &mut memo, &mut Vec::new())?;
        }
    }

    for (id, fields) in memo {
        registry.get_mut(id).shape = TypeShape::Struct(fields);
    }
    Ok(())
}

/// Flattened fields of a struct: promoted fields in embedding order, then
/// declared fields. A declared field shadows a promoted one of the same name.
fn expand(
    registry: &Registry,
    id: TypeId,
    memo: &mut HashMap<TypeId, Vec<FieldRecord>>,
    stack: &mut Vec<TypeId>,
) -> GenResult<Vec<FieldRecord>> {
    if let Some(fields) = memo.get(&id) {
        return Ok(fields.clone());
    }
    if let Some(pos) = stack.iter().position(|&s| s == id) {
        let mut chain: Vec<String> = stack[pos..]
            .iter()
            .map(|&s| registry.get(s).name.clone())
            .collect();
        chain.push(registry.get(id).name.clone());
        return Err(GenError::EmbeddingCycle { chain });
    }
    if stack.len() >= MAX_EMBED_DEPTH {
        let owner = stack.first().copied().unwrap_or(id);
        return Err(GenError::EmbeddingTooDeep {
            owner: registry.get(owner).label(),
            limit: MAX_EMBED_DEPTH,
        });
    }

    let record = registry.get(id);
    let TypeShape::Struct(fields) = &record.shape else {
        return Ok(Vec::new());
    };

    stack.push(id);
    let mut promoted: Vec<FieldRecord> = Vec::new();
    let mut declared: Vec<FieldRecord> = Vec::new();

    for field in fields {
        if !field.is_embedded() {
            declared.push(field.clone());
            continue;
        }

        match registry.resolve(&field.ty) {
            Some(target) if registry.get(target).is_struct() => {
                let inner = expand(registry, target, memo, stack)?;
                let inner = substitute_fields(&inner, &registry.get(target).type_params, type_args(&field.ty));
                for f in inner {
                    if let Some(existing) = promoted
                        .iter()
                        .find(|p| p.go_name.is_some() && p.go_name == f.go_name)
                    {
                        return Err(GenError::FieldCollision {
                            artifact: record.label(),
                            name: f.go_name.clone().unwrap_or_default(),
                            first: existing.origin.clone(),
                            second: f.origin.clone(),
                        });
                    }
                    promoted.push(f);
                }
            }
            Some(target) => declared.push(FieldRecord {
                go_name: Some(registry.get(target).name.clone()),
                ..field.clone()
            }),
            None if field.options.hard_ignore
                || field.json.skip
                || field.options.force_resolver =>
            {
                debug!(
                    owner = %record.label(),
                    embedded = %field.ty,
                    "skipping opted-out embedded type outside the scanned sources"
                );
            }
            // reported when an artifact is lowered from this struct
            None => declared.push(field.clone()),
        }
    }
    stack.pop();

    promoted.retain(|p| p.is_embedded() || !declared.iter().any(|d| d.go_name == p.go_name));
    promoted.extend(declared);
    memo.insert(id, promoted.clone());
    Ok(promoted)
}

// ============================================================================
// Generics
// ============================================================================

/// Name fragment of one type argument: `User`, `[]User` -> `UserList`
fn fragment(ty: &TypeExpr, list_depth: usize) -> String {
    match ty {
        TypeExpr::Pointer(inner) => fragment(inner, list_depth),
        TypeExpr::Slice(inner) | TypeExpr::Array(inner) => fragment(inner, list_depth + 1),
        TypeExpr::Named { name, args, .. } => {
            let nested: String = args.iter().map(|a| fragment(a, 0)).collect();
            generic_fragment(&format!("{name}{nested}"), list_depth)
        }
        TypeExpr::Map(..) => generic_fragment("Map", list_depth),
        TypeExpr::Interface => generic_fragment("Any", list_depth),
        TypeExpr::Other(text) => {
            let cleaned: String = text.chars().filter(|c| c.is_alphanumeric()).collect();
            generic_fragment(&cleaned, list_depth)
        }
    }
}

#[derive(Default)]
struct Instantiator {
    memo: HashMap<(TypeId, Vec<TypeExpr>), TypeId>,
    per_base: HashMap<TypeId, usize>,
    queue: VecDeque<TypeId>,
}

impl Instantiator {
    /// Replace generic references with their concrete instantiation
    fn rewrite(&mut self, registry: &mut Registry, ty: &TypeExpr) -> TypeExpr {
        match ty {
            TypeExpr::Pointer(inner) => TypeExpr::Pointer(Box::new(self.rewrite(registry, inner))),
            TypeExpr::Slice(inner) => TypeExpr::Slice(Box::new(self.rewrite(registry, inner))),
            TypeExpr::Array(inner) => TypeExpr::Array(Box::new(self.rewrite(registry, inner))),
            TypeExpr::Map(k, v) => TypeExpr::Map(
                Box::new(self.rewrite(registry, k)),
                Box::new(self.rewrite(registry, v)),
            ),
            TypeExpr::Named {
                package,
                qualifier,
                name,
                args,
            } if !args.is_empty() => {
                let args: Vec<TypeExpr> = args.iter().map(|a| self.rewrite(registry, a)).collect();
                let base = registry
                    .resolve(ty)
                    .filter(|&b| registry.get(b).is_generic() && registry.get(b).is_struct());

                match base {
                    Some(base) => {
                        let id = self.instantiate(registry, base, args);
                        let record = registry.get(id);
                        TypeExpr::Named {
                            package: Some(record.package.identity().to_string()),
                            qualifier: None,
                            name: record.name.clone(),
                            args: Vec::new(),
                        }
                    }
                    None => TypeExpr::Named {
                        package: package.clone(),
                        qualifier: qualifier.clone(),
                        name: name.clone(),
                        args,
                    },
                }
            }
            other => other.clone(),
        }
    }

    fn instantiate(&mut self, registry: &mut Registry, base: TypeId, args: Vec<TypeExpr>) -> TypeId {
        let key = (base, args);
        if let Some(&id) = self.memo.get(&key) {
            return id;
        }
        let args = &key.1;

        let base_record = registry.get(base);
        let name = format!(
            "{}{}",
            base_record.name,
            args.iter().map(|a| fragment(a, 0)).collect::<String>()
        );
        let sub_index = self.per_base.entry(base).or_insert(0);
        *sub_index += 1;

        let fields = match &base_record.shape {
            TypeShape::Struct(fields) => substitute_fields(fields, &base_record.type_params, args),
            _ => Vec::new(),
        };
        let record = TypeRecord {
            name,
            order: (base_record.order.0, base_record.order.1, *sub_index),
            type_params: Vec::new(),
            shape: TypeShape::Struct(fields),
            artifacts: base_record
                .artifacts
                .iter()
                .map(|a| ArtifactSpec {
                    custom_name: None,
                    ..a.clone()
                })
                .collect(),
            enum_spec: None,
            synthetic: true,
            ..base_record.clone()
        };

        debug!(base = %base_record.name, instance = %record.name, "instantiated generic type");
        let id = registry.push_synthetic(record);
        self.queue.push_back(id);
        self.memo.insert(key, id);
        id
    }
}

fn instantiate_generics(registry: &mut Registry) {
    let mut inst = Instantiator::default();
    inst.queue = registry
        .ids()
        .filter(|&id| {
            let record = registry.get(id);
            record.is_struct() && !record.is_generic()
        })
        .collect();

    while let Some(id) = inst.queue.pop_front() {
        let TypeShape::Struct(fields) = &registry.get(id).shape else {
            continue;
        };
        let mut fields = fields.clone();
        for field in &mut fields {
            field.ty = inst.rewrite(registry, &field.ty);
        }
        registry.get_mut(id).shape = TypeShape::Struct(fields);
    }
}

// ============================================================================
// Lowering
// ============================================================================

fn builtin_scalar(name: &str) -> Option<&'static str> {
    match name {
        "string" => Some("String"),
        "bool" => Some("Boolean"),
        "int" | "int8" | "int16" | "int32" | "int64" | "uint" | "uint8" | "uint16" | "uint32"
        | "uint64" | "uintptr" | "byte" | "rune" => Some("Int"),
        "float32" | "float64" => Some("Float"),
        _ => None,
    }
}

fn is_byte(ty: &TypeExpr) -> bool {
    matches!(ty, TypeExpr::Named { package: None, name, .. } if name == "byte" || name == "uint8")
}

struct Lowering<'a> {
    registry: &'a Registry,
    enums: &'a EnumValues,
    config: &'a GeneratorConfig,
}

impl Lowering<'_> {
    fn blocks(&self) -> GenResult<Vec<SchemaBlock>> {
        let mut blocks: Vec<SchemaBlock> = Vec::new();
        let mut sources: HashMap<String, String> = HashMap::new();

        for id in self.registry.ids() {
            let record = self.registry.get(id);
            if record.is_generic() {
                continue;
            }

            let mut produced = Vec::new();
            if record.enum_spec.is_some() {
                produced.push(self.enum_block(id, record));
            }
            if record.is_struct() {
                for (index, spec) in record.artifacts.iter().enumerate() {
                    if let Some(block) = self.struct_block(record, spec, index)? {
                        produced.push(block);
                    }
                }
            }

            for block in produced {
                if let Some(first) = sources.get(&block.name) {
                    return Err(GenError::ArtifactCollision {
                        name: block.name,
                        first: first.clone(),
                        second: block.source,
                    });
                }
                sources.insert(block.name.clone(), block.source.clone());
                blocks.push(block);
            }
        }

        Ok(blocks)
    }

    fn go_model(&self, record: &TypeRecord) -> Option<String> {
        if !self.config.use_gqlgen_directives || record.synthetic {
            return None;
        }
        record
            .package
            .import_path
            .as_ref()
            .map(|path| format!("{path}.{}", record.name))
    }

    fn enum_block(&self, id: TypeId, record: &TypeRecord) -> SchemaBlock {
        let spec = record.enum_spec.clone().unwrap_or_default();
        let (file, decl, sub) = record.order;
        SchemaBlock {
            kind: ArtifactKind::Enum,
            name: derive_type_name(
                &record.name,
                spec.custom_name.as_deref(),
                ArtifactKind::Enum,
                &self.config.naming,
            ),
            description: spec.description.or_else(|| record.doc.clone()),
            go_model: self.go_model(record),
            namespace: record.namespace.clone(),
            package: record.package.name.clone(),
            order: (file, decl, sub, 0),
            fields: Vec::new(),
            values: self.enums.get(&id).cloned().unwrap_or_default(),
            source: record.label(),
        }
    }

    fn struct_block(
        &self,
        record: &TypeRecord,
        spec: &ArtifactSpec,
        index: usize,
    ) -> GenResult<Option<SchemaBlock>> {
        let TypeShape::Struct(record_fields) = &record.shape else {
            return Ok(None);
        };
        let name = artifact_name(record, spec, &self.config.naming);
        let target = artifact_target(record, spec, &name);
        let ignore_all = spec.ignore_all || record.ignore_all;

        let mut fields: Vec<(BlockField, String)> = Vec::new();
        for field in record_fields {
            if field.is_embedded() {
                return Err(GenError::UnresolvedType {
                    owner: record.label(),
                    field: field.ty.to_string(),
                    type_name: field.ty.to_string(),
                });
            }
            if !field.visible_in(&target, ignore_all) {
                continue;
            }
            let go_name = field.go_name.as_deref().unwrap_or_default();
            let block_field = BlockField {
                name: resolve_field_name(
                    go_name,
                    field.options.name.as_deref(),
                    field.json.name.as_deref(),
                    self.config.use_json_tag,
                    self.config.field_case,
                ),
                type_text: self.field_type(&name, field, spec.kind)?,
                description: field
                    .options
                    .description
                    .clone()
                    .or_else(|| field.doc.clone()),
                deprecated: field.options.deprecated.clone(),
                force_resolver: field.options.force_resolver,
            };
            fields.push((block_field, field.origin.clone()));
        }

        for extra in &record.extra_fields {
            if !extra.on.matches(&target) {
                continue;
            }
            let block_field = BlockField {
                name: extra.name.clone(),
                type_text: extra.type_text.clone(),
                description: extra.description.clone(),
                deprecated: extra.deprecated.clone(),
                force_resolver: true,
            };
            fields.push((block_field, format!("@gqlExtraField {}.{}", record.name, extra.name)));
        }

        for (i, (field, origin)) in fields.iter().enumerate() {
            if let Some((_, first)) = fields[..i].iter().find(|(f, _)| f.name == field.name) {
                return Err(GenError::FieldCollision {
                    artifact: name,
                    name: field.name.clone(),
                    first: first.clone(),
                    second: origin.clone(),
                });
            }
        }

        if fields.is_empty() && !self.config.include_empty_types {
            warn!(
                artifact = %name,
                source = %record.label(),
                "skipping {} with no visible fields",
                spec.kind
            );
            return Ok(None);
        }

        let (file, decl, sub) = record.order;
        Ok(Some(SchemaBlock {
            kind: spec.kind,
            description: spec.description.clone().or_else(|| record.doc.clone()),
            go_model: self.go_model(record),
            namespace: record.namespace.clone(),
            package: record.package.name.clone(),
            order: (file, decl, sub, index + 1),
            fields: fields.into_iter().map(|(f, _)| f).collect(),
            values: Vec::new(),
            source: format!("{} ({})", record.label(), spec.kind),
            name,
        }))
    }

    /// Complete SDL type of a field, with nullability applied
    fn field_type(&self, owner: &str, field: &FieldRecord, kind: ArtifactKind) -> GenResult<String> {
        if let Some(text) = &field.options.type_override {
            return Ok(text.clone());
        }

        let is_id = self.config.map_id_fields
            && field.go_name.as_deref() == Some("ID")
            && self.is_id_capable(field.ty.pointee());
        let (mut text, nullable) = if is_id {
            ("ID".to_string(), field.ty.is_pointer())
        } else {
            self.type_ref(&field.ty, field, owner, kind, 0)?
        };

        let nullable = match field.options.nullability {
            Some(Nullability::Optional) => true,
            Some(Nullability::Required) => false,
            None => nullable,
        };
        if !nullable {
            text.push('!');
        }
        Ok(text)
    }

    /// String or integer, directly or through a named type
    fn is_id_capable(&self, ty: &TypeExpr) -> bool {
        match ty {
            TypeExpr::Named { package: None, name, .. } => {
                matches!(builtin_scalar(name), Some("String" | "Int"))
            }
            TypeExpr::Named { .. } => self.registry.resolve(ty).is_some_and(|id| {
                let record = self.registry.get(id);
                record.enum_spec.is_none()
                    && matches!(
                        &record.shape,
                        TypeShape::Named(TypeExpr::Named { package: None, name, .. })
                            | TypeShape::Alias(TypeExpr::Named { package: None, name, .. })
                            if matches!(builtin_scalar(name), Some("String" | "Int"))
                    )
            }),
            _ => false,
        }
    }

    fn scalar(&self, key: &str) -> Option<String> {
        self.config
            .scalars
            .get(key)
            .cloned()
            .or_else(|| DEFAULT_SCALARS.get(key).map(|s| s.to_string()))
    }

    fn named_scalar(&self, package: &str, qualifier: Option<&str>, name: &str) -> Option<String> {
        let last_segment = package.rsplit('/').next().unwrap_or(package);
        [Some(package), qualifier, Some(last_segment)]
            .into_iter()
            .flatten()
            .find_map(|p| self.scalar(&format!("{p}.{name}")))
    }

    /// SDL type without the trailing `!`, and whether it is nullable
    fn type_ref(
        &self,
        ty: &TypeExpr,
        field: &FieldRecord,
        owner: &str,
        kind: ArtifactKind,
        depth: usize,
    ) -> GenResult<(String, bool)> {
        match ty {
            TypeExpr::Pointer(inner) => {
                let (text, _) = self.type_ref(inner, field, owner, kind, depth)?;
                Ok((text, true))
            }
            TypeExpr::Slice(inner) | TypeExpr::Array(inner) => {
                if is_byte(inner) {
                    return Ok(("String".to_string(), false));
                }
                let (element, nullable) = self.type_ref(inner, field, owner, kind, depth)?;
                let bang = if nullable { "" } else { "!" };
                Ok((format!("[{element}{bang}]"), false))
            }
            TypeExpr::Map(..) => Ok((self.scalar("map").unwrap_or_default(), false)),
            TypeExpr::Interface => Ok((self.scalar("any").unwrap_or_default(), false)),
            TypeExpr::Named {
                package: None,
                name,
                ..
            } => match builtin_scalar(name) {
                Some(scalar) => Ok((scalar.to_string(), false)),
                None => self.unresolved(ty, field, owner, kind),
            },
            TypeExpr::Named {
                package: Some(package),
                qualifier,
                name,
                ..
            } => {
                if let Some(scalar) = self.named_scalar(package, qualifier.as_deref(), name) {
                    return Ok((scalar, false));
                }
                match self.registry.resolve(ty) {
                    Some(id) => self.record_ref(id, ty, field, owner, kind, depth),
                    None => self.unresolved(ty, field, owner, kind),
                }
            }
            TypeExpr::Other(_) => self.unresolved(ty, field, owner, kind),
        }
    }

    fn record_ref(
        &self,
        id: TypeId,
        ty: &TypeExpr,
        field: &FieldRecord,
        owner: &str,
        kind: ArtifactKind,
        depth: usize,
    ) -> GenResult<(String, bool)> {
        let record = self.registry.get(id);
        let naming = &self.config.naming;

        if let Some(spec) = &record.enum_spec {
            let name = derive_type_name(&record.name, spec.custom_name.as_deref(), ArtifactKind::Enum, naming);
            return Ok((name, false));
        }

        match &record.shape {
            TypeShape::Struct(_) => match record.artifacts.iter().find(|a| a.kind == kind) {
                Some(spec) => Ok((artifact_name(record, spec, naming), false)),
                None => self.unresolved(ty, field, owner, kind),
            },
            TypeShape::Named(underlying) | TypeShape::Alias(underlying) => {
                if depth >= MAX_EMBED_DEPTH {
                    return self.unresolved(ty, field, owner, kind);
                }
                self.type_ref(underlying, field, owner, kind, depth + 1)
            }
        }
    }

    fn unresolved(
        &self,
        ty: &TypeExpr,
        field: &FieldRecord,
        owner: &str,
        kind: ArtifactKind,
    ) -> GenResult<(String, bool)> {
        if field.options.force_resolver {
            let go_name = match ty.element() {
                TypeExpr::Named { name, .. } => name.clone(),
                other => other.to_string(),
            };
            return Ok((derive_type_name(&go_name, None, kind, &self.config.naming), false));
        }
        Err(GenError::UnresolvedType {
            owner: owner.to_string(),
            field: field.go_name.clone().unwrap_or_default(),
            type_name: ty.to_string(),
        })
    }
}
