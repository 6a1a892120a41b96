//! Directive and tag interpretation.
//!
//! Turns scanned [`GoFile`]s into [`TypeRecord`]s and [`ConstRecord`]s:
//! doc comments are parsed for directives, struct tags for field options,
//! and every type expression gets a canonical package identity so that
//! declarations can be joined across files and packages.

use crate::directive::{Directive, DirectiveError, DirectiveKind, DocBlock, parse_doc};
use crate::ir::{
    ArtifactKind, ArtifactSpec, ConstRecord, EnumSpec, EnumValueSpec, ExtraField, FieldRecord,
    PackageRef, Scope, TypeExpr, TypeRecord, TypeShape,
};
use crate::source::{GoConst, GoField, GoFile, GoTypeBody, GoTypeDecl};
use crate::tag::parse_field_tags;
use gqlforge_core::{GenError, GenResult, GeneratorConfig};
use std::collections::HashMap;
use std::path::Path;

/// Predeclared Go type names
pub const GO_BUILTINS: &[&str] = &[
    "bool",
    "string",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
    "byte",
    "rune",
    "float32",
    "float64",
    "complex64",
    "complex128",
    "error",
    "any",
    "comparable",
];

/// Annotated declarations of every scanned file
#[derive(Debug, Clone, Default)]
pub struct Annotated {
    pub types: Vec<TypeRecord>,
    pub consts: Vec<ConstRecord>,
}

/// Interpret the directives and tags of every file
pub fn annotate(files: &[GoFile], config: &GeneratorConfig) -> GenResult<Annotated> {
    let package_namespaces = package_namespaces(files)?;
    let mut out = Annotated::default();

    for (file_index, file) in files.iter().enumerate() {
        let package = PackageRef {
            name: file.package.clone(),
            import_path: file.import_path.clone(),
        };
        let ctx = FileContext {
            file,
            identity: package.identity().to_string(),
            config,
        };
        let package_namespace = package_namespaces.get(package.identity()).cloned();

        for (decl_index, decl) in file.types.iter().enumerate() {
            let mut record = ctx.type_record(decl, &package, (file_index, decl_index, 0))?;
            if record.namespace.is_none() {
                record.namespace = package_namespace.clone();
            }
            out.types.push(record);
        }

        for (decl_index, constant) in file.consts.iter().enumerate() {
            out.consts
                .push(ctx.const_record(constant, (file_index, decl_index, 0))?);
        }
    }

    Ok(out)
}

/// `@gqlNamespace` from package docs, first one per package wins
fn package_namespaces(files: &[GoFile]) -> GenResult<HashMap<String, String>> {
    let mut namespaces = HashMap::new();

    for file in files {
        let owner = format!("package {}", file.package);
        let doc = parse_owner_doc(&file.path, &owner, file.package_doc.as_deref())?;

        for directive in &doc.directives {
            if directive.kind != DirectiveKind::Namespace {
                return Err(misplaced(&file.path, &owner, directive, "a package clause"));
            }
            let identity = file.import_path.as_deref().unwrap_or(&file.package);
            if let Some(name) = directive.text("name") {
                namespaces.entry(identity.to_string()).or_insert(name);
            }
        }
    }

    Ok(namespaces)
}

fn parse_owner_doc(path: &Path, owner: &str, doc: Option<&str>) -> GenResult<DocBlock> {
    let Some(doc) = doc else {
        return Ok(DocBlock::default());
    };
    parse_doc(doc).map_err(|e: DirectiveError| GenError::Directive {
        path: path.to_path_buf(),
        owner: owner.to_string(),
        directive: e.directive,
        message: e.message,
    })
}

fn misplaced(path: &Path, owner: &str, directive: &Directive, place: &str) -> GenError {
    GenError::Directive {
        path: path.to_path_buf(),
        owner: owner.to_string(),
        directive: directive.kind.display_name().to_string(),
        message: format!("not allowed on {place}"),
    }
}

struct FileContext<'a> {
    file: &'a GoFile,
    identity: String,
    config: &'a GeneratorConfig,
}

impl FileContext<'_> {
    fn directive_error(&self, owner: &str, directive: &str, message: impl Into<String>) -> GenError {
        GenError::Directive {
            path: self.file.path.clone(),
            owner: owner.to_string(),
            directive: directive.to_string(),
            message: message.into(),
        }
    }

    fn prose(&self, doc: DocBlock) -> Option<String> {
        if self.config.doc_descriptions {
            doc.prose
        } else {
            None
        }
    }

    fn type_record(
        &self,
        decl: &GoTypeDecl,
        package: &PackageRef,
        order: (usize, usize, usize),
    ) -> GenResult<TypeRecord> {
        let owner = decl.name.as_str();
        let doc = parse_owner_doc(&self.file.path, owner, decl.doc.as_deref())?;
        let is_struct_literal = matches!(decl.body, GoTypeBody::Struct(_));

        let shape = match &decl.body {
            GoTypeBody::Struct(fields) => TypeShape::Struct(
                fields
                    .iter()
                    .map(|f| self.field_record(decl, f))
                    .collect::<GenResult<_>>()?,
            ),
            GoTypeBody::Named(ty) => TypeShape::Named(self.canonical(ty, &decl.type_params)),
            GoTypeBody::Alias(ty) => TypeShape::Alias(self.canonical(ty, &decl.type_params)),
        };

        let mut record = TypeRecord {
            name: decl.name.clone(),
            package: package.clone(),
            path: self.file.path.clone(),
            line: decl.line,
            order,
            type_params: decl.type_params.clone(),
            shape,
            artifacts: Vec::new(),
            enum_spec: None,
            ignore_all: false,
            extra_fields: Vec::new(),
            namespace: None,
            doc: None,
            synthetic: false,
        };

        for directive in &doc.directives {
            match directive.kind {
                DirectiveKind::Type | DirectiveKind::Input => {
                    let kind = if directive.kind == DirectiveKind::Type {
                        ArtifactKind::Type
                    } else {
                        ArtifactKind::Input
                    };
                    record.artifacts.push(ArtifactSpec {
                        kind,
                        custom_name: directive.text("name"),
                        description: directive.text("description"),
                        ignore_all: directive.flag("ignoreall"),
                        discovered: false,
                    });
                }
                DirectiveKind::IgnoreAll => record.ignore_all = true,
                DirectiveKind::ExtraField => {
                    record.extra_fields.push(self.extra_field(owner, directive)?);
                }
                DirectiveKind::Enum => {
                    if is_struct_literal {
                        return Err(misplaced(&self.file.path, owner, directive, "a struct type"));
                    }
                    if record.enum_spec.is_some() {
                        return Err(self.directive_error(
                            owner,
                            directive.kind.display_name(),
                            "declared more than once",
                        ));
                    }
                    record.enum_spec = Some(EnumSpec {
                        custom_name: directive.text("name"),
                        description: directive.text("description"),
                    });
                }
                DirectiveKind::Namespace => {
                    if record.namespace.is_some() {
                        return Err(self.directive_error(
                            owner,
                            directive.kind.display_name(),
                            "declared more than once",
                        ));
                    }
                    record.namespace = directive.text("name");
                }
                DirectiveKind::EnumValue => {
                    return Err(misplaced(&self.file.path, owner, directive, "a type declaration"));
                }
            }
        }

        record.doc = self.prose(doc);
        Ok(record)
    }

    fn extra_field(&self, owner: &str, directive: &Directive) -> GenResult<ExtraField> {
        let name = directive.text("name").unwrap_or_default();
        let type_text = directive
            .get("type")
            .map(|p| p.verbatim())
            .unwrap_or_default();
        if name.trim().is_empty() || type_text.trim().is_empty() {
            return Err(self.directive_error(
                owner,
                directive.kind.display_name(),
                "`name` and `type` must not be empty",
            ));
        }

        Ok(ExtraField {
            name,
            type_text,
            description: directive.text("description"),
            deprecated: directive.deprecation("deprecated"),
            on: directive.scope("on").unwrap_or(Scope::All),
        })
    }

    fn field_record(&self, decl: &GoTypeDecl, field: &GoField) -> GenResult<FieldRecord> {
        let label = field.name.clone().unwrap_or_else(|| field.ty.to_string());
        let owner = format!("{}.{}", decl.name, label);

        let doc = parse_owner_doc(&self.file.path, &owner, field.doc.as_deref())?;
        if let Some(directive) = doc.directives.first() {
            return Err(self.directive_error(
                &owner,
                directive.kind.display_name(),
                "not allowed on fields, use the `gql` struct tag",
            ));
        }

        let tags = parse_field_tags(field.tag.as_deref())
            .map_err(|message| self.directive_error(&owner, "gql tag", message))?;

        // a named embed is a regular field called after its type
        let go_name = match &field.name {
            Some(name) => Some(name.clone()),
            None if tags.json.name.is_some() || tags.options.name.is_some() => {
                match field.ty.pointee() {
                    TypeExpr::Named { name, .. } => Some(name.clone()),
                    other => Some(other.to_string()),
                }
            }
            None => None,
        };

        Ok(FieldRecord {
            go_name,
            ty: self.canonical(&field.ty, &decl.type_params),
            json: tags.json,
            options: tags.options,
            doc: self.prose(doc),
            origin: owner,
            line: field.line,
        })
    }

    fn const_record(
        &self,
        constant: &GoConst,
        order: (usize, usize, usize),
    ) -> GenResult<ConstRecord> {
        let owner = constant.name.as_str();
        let doc = parse_owner_doc(&self.file.path, owner, constant.doc.as_deref())?;

        let mut value_spec = None;
        for directive in &doc.directives {
            if directive.kind != DirectiveKind::EnumValue {
                return Err(misplaced(&self.file.path, owner, directive, "a constant"));
            }
            if value_spec.is_some() {
                return Err(self.directive_error(
                    owner,
                    directive.kind.display_name(),
                    "declared more than once",
                ));
            }
            value_spec = Some(EnumValueSpec {
                name: directive.text("name"),
                description: directive.text("description"),
                deprecated: directive.deprecation("deprecated"),
            });
        }

        Ok(ConstRecord {
            name: constant.name.clone(),
            ty: constant.ty.as_ref().map(|t| self.canonical(t, &[])),
            path: self.file.path.clone(),
            line: constant.line,
            order,
            value_spec,
            doc: self.prose(doc),
        })
    }

    /// Attach canonical package identities to every named type
    fn canonical(&self, ty: &TypeExpr, type_params: &[String]) -> TypeExpr {
        let recurse = |t: &TypeExpr| Box::new(self.canonical(t, type_params));
        match ty {
            TypeExpr::Named {
                qualifier,
                name,
                args,
                ..
            } => {
                let package = match qualifier {
                    Some(alias) => Some(
                        self.file
                            .imports
                            .get(alias)
                            .cloned()
                            .unwrap_or_else(|| alias.clone()),
                    ),
                    None if type_params.contains(name)
                        || GO_BUILTINS.contains(&name.as_str()) =>
                    {
                        None
                    }
                    None => Some(self.identity.clone()),
                };
                TypeExpr::Named {
                    package,
                    qualifier: qualifier.clone(),
                    name: name.clone(),
                    args: args.iter().map(|a| self.canonical(a, type_params)).collect(),
                }
            }
            TypeExpr::Pointer(inner) => TypeExpr::Pointer(recurse(inner)),
            TypeExpr::Slice(inner) => TypeExpr::Slice(recurse(inner)),
            TypeExpr::Array(inner) => TypeExpr::Array(recurse(inner)),
            TypeExpr::Map(k, v) => TypeExpr::Map(recurse(k), recurse(v)),
            TypeExpr::Interface | TypeExpr::Other(_) => ty.clone(),
        }
    }
}

#[cfg(test)]
#[path = "annotate/annotate_tests.rs"]
mod annotate_tests;
