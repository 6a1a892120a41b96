//! Intermediate representation shared by every pipeline stage.
//!
//! The scanner produces raw Go declarations, [`crate::annotate`] turns them
//! into [`TypeRecord`]s and [`ConstRecord`]s, the resolver mutates the records
//! (embedding expansion, generic instantiation, discovered artifacts) and
//! finally lowers them into [`SchemaBlock`]s that the emitter renders.
//!
//! # Structure
//!
//! - [`TypeExpr`]: Go type expression with canonical package identities
//! - [`TypeRecord`] / [`FieldRecord`]: one Go type declaration and its fields
//! - [`ArtifactSpec`]: one requested output block of a type
//! - [`SchemaBlock`]: a fully resolved, named block ready to render

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Kind of an emitted block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Type,
    Input,
    Enum,
}

impl ArtifactKind {
    /// Keyword usable in scope lists and used in rendered SDL
    pub fn keyword(self) -> &'static str {
        match self {
            ArtifactKind::Type => "type",
            ArtifactKind::Input => "input",
            ArtifactKind::Enum => "enum",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Go type expression.
///
/// `package` on [`TypeExpr::Named`] is the canonical package identity
/// (import path when known, else package name); `None` marks builtins and
/// generic type parameters. `qualifier` keeps the alias as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeExpr {
    Named {
        package: Option<String>,
        qualifier: Option<String>,
        name: String,
        args: Vec<TypeExpr>,
    },
    Pointer(Box<TypeExpr>),
    Slice(Box<TypeExpr>),
    Array(Box<TypeExpr>),
    Map(Box<TypeExpr>, Box<TypeExpr>),
    Interface,
    Other(String),
}

impl TypeExpr {
    /// Unqualified named type without arguments
    pub fn named(name: impl Into<String>) -> Self {
        TypeExpr::Named {
            package: None,
            qualifier: None,
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Strip any number of pointer layers
    pub fn pointee(&self) -> &TypeExpr {
        match self {
            TypeExpr::Pointer(inner) => inner.pointee(),
            other => other,
        }
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, TypeExpr::Pointer(_))
    }

    /// Innermost element type through pointers, slices and arrays
    pub fn element(&self) -> &TypeExpr {
        match self {
            TypeExpr::Pointer(inner) | TypeExpr::Slice(inner) | TypeExpr::Array(inner) => {
                inner.element()
            }
            other => other,
        }
    }

    /// Replace generic parameters structurally
    pub fn substitute(&self, params: &[String], args: &[TypeExpr]) -> TypeExpr {
        match self {
            TypeExpr::Named {
                package: None,
                name,
                args: own_args,
                ..
            } if own_args.is_empty() => params
                .iter()
                .position(|p| p == name)
                .and_then(|i| args.get(i).cloned())
                .unwrap_or_else(|| self.clone()),
            TypeExpr::Named {
                package,
                qualifier,
                name,
                args: own_args,
            } => TypeExpr::Named {
                package: package.clone(),
                qualifier: qualifier.clone(),
                name: name.clone(),
                args: own_args.iter().map(|a| a.substitute(params, args)).collect(),
            },
            TypeExpr::Pointer(inner) => TypeExpr::Pointer(Box::new(inner.substitute(params, args))),
            TypeExpr::Slice(inner) => TypeExpr::Slice(Box::new(inner.substitute(params, args))),
            TypeExpr::Array(inner) => TypeExpr::Array(Box::new(inner.substitute(params, args))),
            TypeExpr::Map(k, v) => TypeExpr::Map(
                Box::new(k.substitute(params, args)),
                Box::new(v.substitute(params, args)),
            ),
            TypeExpr::Interface | TypeExpr::Other(_) => self.clone(),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named {
                qualifier,
                name,
                args,
                ..
            } => {
                if let Some(q) = qualifier {
                    write!(f, "{q}.")?;
                }
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("[")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str("]")?;
                }
                Ok(())
            }
            TypeExpr::Pointer(inner) => write!(f, "*{inner}"),
            TypeExpr::Slice(inner) => write!(f, "[]{inner}"),
            TypeExpr::Array(inner) => write!(f, "[N]{inner}"),
            TypeExpr::Map(k, v) => write!(f, "map[{k}]{v}"),
            TypeExpr::Interface => f.write_str("any"),
            TypeExpr::Other(text) => f.write_str(text),
        }
    }
}

/// Set of artifacts a field option or extra field applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// `*`, or a bare flag
    All,
    /// Explicit entries; empty means nothing
    Only(Vec<String>),
}

impl Scope {
    /// Build a scope from list entries, collapsing `*`
    pub fn from_entries(entries: Vec<String>) -> Self {
        let entries: Vec<String> = entries
            .into_iter()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect();
        if entries.iter().any(|e| e == "*") {
            Scope::All
        } else {
            Scope::Only(entries)
        }
    }

    /// Does this scope cover the given artifact
    pub fn matches(&self, target: &ArtifactTarget<'_>) -> bool {
        match self {
            Scope::All => true,
            Scope::Only(entries) => entries.iter().any(|e| target.answers_to(e)),
        }
    }
}

/// Identity of an artifact as seen by scope matching
#[derive(Debug, Clone, Copy)]
pub struct ArtifactTarget<'a> {
    pub kind: ArtifactKind,
    pub final_name: &'a str,
    pub custom_name: Option<&'a str>,
    pub go_name: &'a str,
}

impl ArtifactTarget<'_> {
    fn answers_to(&self, entry: &str) -> bool {
        entry == self.final_name
            || entry == self.go_name
            || self.custom_name == Some(entry)
            || entry.eq_ignore_ascii_case(self.kind.keyword())
    }
}

/// `@deprecated` marker with optional reason
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Deprecation {
    pub reason: Option<String>,
}

/// Explicit nullability override from a field tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nullability {
    Optional,
    Required,
}

/// Interpreted `json:"..."` tag
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JsonTag {
    pub name: Option<String>,
    /// `json:"-"`
    pub skip: bool,
}

/// Interpreted `gql:"..."` tag
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldOptions {
    pub name: Option<String>,
    pub type_override: Option<String>,
    pub description: Option<String>,
    pub deprecated: Option<Deprecation>,
    pub force_resolver: bool,
    pub include: Option<Scope>,
    pub ignore: Option<Scope>,
    pub read_only: bool,
    pub write_only: bool,
    pub nullability: Option<Nullability>,
    /// `gql:"-"`
    pub hard_ignore: bool,
}

/// One struct field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRecord {
    /// Go field name; `None` for an embedded field
    pub go_name: Option<String>,
    pub ty: TypeExpr,
    pub json: JsonTag,
    pub options: FieldOptions,
    /// Prose from the field's doc and trailing comments
    pub doc: Option<String>,
    /// `Owner.Field`, for diagnostics
    pub origin: String,
    pub line: usize,
}

impl FieldRecord {
    /// Embedded field that should be flattened into its owner
    pub fn is_embedded(&self) -> bool {
        self.go_name.is_none()
    }

    pub fn is_exported(&self) -> bool {
        self.go_name
            .as_deref()
            .and_then(|n| n.chars().next())
            .is_some_and(char::is_uppercase)
    }

    /// Visibility of this field in one artifact.
    ///
    /// Checked in order: hard ignore, explicit include, export status,
    /// explicit ignore, `json:"-"`, read/write-only, `ignoreAll`.
    pub fn visible_in(&self, target: &ArtifactTarget<'_>, ignore_all: bool) -> bool {
        let opts = &self.options;
        if opts.hard_ignore {
            return false;
        }
        if opts.include.as_ref().is_some_and(|s| s.matches(target)) {
            return true;
        }
        if !self.is_exported() {
            return false;
        }
        if opts.ignore.as_ref().is_some_and(|s| s.matches(target)) {
            return false;
        }
        if self.json.skip {
            return false;
        }
        match target.kind {
            ArtifactKind::Input if opts.read_only => return false,
            ArtifactKind::Type if opts.write_only => return false,
            _ => {}
        }
        !ignore_all
    }
}

/// One requested output block of a struct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSpec {
    pub kind: ArtifactKind,
    pub custom_name: Option<String>,
    pub description: Option<String>,
    pub ignore_all: bool,
    /// Added by auto-discovery rather than a directive
    pub discovered: bool,
}

impl ArtifactSpec {
    pub fn discovered(kind: ArtifactKind) -> Self {
        Self {
            kind,
            custom_name: None,
            description: None,
            ignore_all: false,
            discovered: true,
        }
    }
}

/// `@gqlEnum` request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnumSpec {
    pub custom_name: Option<String>,
    pub description: Option<String>,
}

/// `@gqlExtraField` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraField {
    pub name: String,
    pub type_text: String,
    pub description: Option<String>,
    pub deprecated: Option<Deprecation>,
    pub on: Scope,
}

/// Package a declaration belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageRef {
    /// Go package name from the `package` clause
    pub name: String,
    /// Import path derived from `go.mod`, when one was found
    pub import_path: Option<String>,
}

impl PackageRef {
    /// Canonical identity used to join declarations across files
    pub fn identity(&self) -> &str {
        self.import_path.as_deref().unwrap_or(&self.name)
    }
}

/// Stable position of a declaration: file visit index, declaration index,
/// sub-index for synthesized instantiations
pub type DeclOrder = (usize, usize, usize);

/// Body of a type declaration
#[derive(Debug, Clone, PartialEq)]
pub enum TypeShape {
    Struct(Vec<FieldRecord>),
    /// `type Status string`
    Named(TypeExpr),
    /// `type ID = string`
    Alias(TypeExpr),
}

/// One Go type declaration with its directives
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRecord {
    pub name: String,
    pub package: PackageRef,
    pub path: PathBuf,
    pub line: usize,
    pub order: DeclOrder,
    pub type_params: Vec<String>,
    pub shape: TypeShape,
    pub artifacts: Vec<ArtifactSpec>,
    pub enum_spec: Option<EnumSpec>,
    /// `@gqlIgnoreAll`
    pub ignore_all: bool,
    pub extra_fields: Vec<ExtraField>,
    /// `@gqlNamespace` on the type or its package
    pub namespace: Option<String>,
    /// Prose from the type's doc comment
    pub doc: Option<String>,
    /// Generic instantiation synthesized by the resolver
    pub synthetic: bool,
}

impl TypeRecord {
    pub fn is_struct(&self) -> bool {
        matches!(self.shape, TypeShape::Struct(_))
    }

    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    /// Does any artifact of this kind exist
    pub fn has_artifact(&self, kind: ArtifactKind) -> bool {
        self.artifacts.iter().any(|a| a.kind == kind)
    }

    /// `Type.Name` style label for diagnostics
    pub fn label(&self) -> String {
        format!("{}.{}", self.package.name, self.name)
    }
}

/// `@gqlEnumValue` request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnumValueSpec {
    pub name: Option<String>,
    pub description: Option<String>,
    pub deprecated: Option<Deprecation>,
}

/// One `const` declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ConstRecord {
    pub name: String,
    /// Declared or implicitly repeated type
    pub ty: Option<TypeExpr>,
    pub path: PathBuf,
    pub line: usize,
    pub order: DeclOrder,
    pub value_spec: Option<EnumValueSpec>,
    pub doc: Option<String>,
}

/// Resolved value of an emitted enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValueRecord {
    pub const_name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub deprecated: Option<Deprecation>,
}

/// One field of an emitted block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockField {
    pub name: String,
    pub type_text: String,
    pub description: Option<String>,
    pub deprecated: Option<Deprecation>,
    pub force_resolver: bool,
}

/// A fully resolved type, input or enum block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaBlock {
    pub kind: ArtifactKind,
    pub name: String,
    pub description: Option<String>,
    /// `import/path.GoName` for `@goModel`
    pub go_model: Option<String>,
    /// Explicit `@gqlNamespace`
    pub namespace: Option<String>,
    /// Go package name of the source declaration
    pub package: String,
    /// Declaration order plus artifact index within the type
    pub order: (usize, usize, usize, usize),
    pub fields: Vec<BlockField>,
    pub values: Vec<EnumValueRecord>,
    /// Go declaration label, for diagnostics
    pub source: String,
}

impl SchemaBlock {
    /// Namespace used for grouping: explicit directive, else Go package
    pub fn effective_namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or(&self.package)
    }

    pub fn is_empty(&self) -> bool {
        match self.kind {
            ArtifactKind::Enum => self.values.is_empty(),
            _ => self.fields.is_empty(),
        }
    }
}
