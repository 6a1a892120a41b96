//! Generator configuration types
//!
//! The configuration is plain data: the CLI (or any other host) loads,
//! defaults and validates it, then hands it to the pipeline by reference.

use crate::error::{GenError, GenResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// How emitted blocks are grouped into files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStrategy {
    /// Everything in one file
    #[default]
    Single,
    /// One file per type, input or enum
    Multiple,
    /// One file per namespace (Go package unless overridden)
    Package,
}

/// Case style applied to field names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldCase {
    /// `lowerCamel`
    #[default]
    Camel,
    /// `snake_case`
    Snake,
    /// `UpperCamel`
    Pascal,
    /// Go field name unchanged
    #[serde(alias = "none")]
    Original,
}

/// Which non-annotated types are pulled into the output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryStrategy {
    /// Only annotated types
    #[default]
    None,
    /// Types reachable from annotated types, up to `max_depth`
    Referenced,
    /// Every scanned struct
    All,
    /// Structs whose names match `patterns`
    Patterns,
}

/// Where the preserved region sits in a generated file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeepPosition {
    /// Right after the file header
    Top,
    /// After the last block
    #[default]
    Bottom,
}

/// Name transformation lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Prefixes removed from Go type names (first match only)
    #[serde(default)]
    pub strip_prefixes: Vec<String>,

    /// Suffixes removed from Go type names (first match only)
    #[serde(default)]
    pub strip_suffixes: Vec<String>,

    /// Prefix added to type and enum names
    #[serde(default)]
    pub type_prefix: String,

    /// Suffix added to type and enum names
    #[serde(default)]
    pub type_suffix: String,

    /// Prefix added to input names
    #[serde(default)]
    pub input_prefix: String,

    /// Suffix added to input names, after `input_token`
    #[serde(default)]
    pub input_suffix: String,

    /// Token appended to every derived input name
    #[serde(default = "default_input_token")]
    pub input_token: String,
}

fn default_input_token() -> String {
    "Input".to_string()
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            strip_prefixes: Vec::new(),
            strip_suffixes: Vec::new(),
            type_prefix: String::new(),
            type_suffix: String::new(),
            input_prefix: String::new(),
            input_suffix: String::new(),
            input_token: default_input_token(),
        }
    }
}

/// Auto-discovery of referenced types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoDiscoveryConfig {
    #[serde(default)]
    pub strategy: DiscoveryStrategy,

    /// Maximum breadth-first depth from an annotated type; 0 means unlimited
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Glob patterns over Go type names, used by [`DiscoveryStrategy::Patterns`]
    #[serde(default)]
    pub patterns: Vec<String>,
}

fn default_max_depth() -> usize {
    3
}

impl Default for AutoDiscoveryConfig {
    fn default() -> Self {
        Self {
            strategy: DiscoveryStrategy::default(),
            max_depth: default_max_depth(),
            patterns: Vec::new(),
        }
    }
}

/// Preserved-region markers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeepConfig {
    #[serde(default = "default_begin_marker")]
    pub begin_marker: String,

    #[serde(default = "default_end_marker")]
    pub end_marker: String,

    #[serde(default)]
    pub position: KeepPosition,
}

fn default_begin_marker() -> String {
    "# @gqlKeepBegin".to_string()
}

fn default_end_marker() -> String {
    "# @gqlKeepEnd".to_string()
}

impl Default for KeepConfig {
    fn default() -> Self {
        Self {
            begin_marker: default_begin_marker(),
            end_marker: default_end_marker(),
            position: KeepPosition::default(),
        }
    }
}

/// Complete generator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Root specifiers: files, directories, `dir/*`, `dir/**`, `dir/...`
    #[serde(default)]
    pub roots: Vec<String>,

    /// Output directory
    #[serde(default = "default_output")]
    pub output: PathBuf,

    #[serde(default)]
    pub strategy: OutputStrategy,

    /// File name used by [`OutputStrategy::Single`]
    #[serde(default = "default_schema_file_name")]
    pub schema_file_name: String,

    /// Extension (without dot) used by the per-file strategies
    #[serde(default = "default_extension")]
    pub extension: String,

    #[serde(default)]
    pub field_case: FieldCase,

    /// Take field names from `json:"..."` tags when no `gql` name is given
    #[serde(default = "default_true")]
    pub use_json_tag: bool,

    /// Emit gqlgen `@goModel` / `@goField` directives
    #[serde(default)]
    pub use_gqlgen_directives: bool,

    /// Use Go doc comment prose as descriptions
    #[serde(default = "default_true")]
    pub doc_descriptions: bool,

    /// Map string or integer fields named `ID` to the `ID` scalar
    #[serde(default = "default_true")]
    pub map_id_fields: bool,

    /// Emit types and inputs that end up with no fields
    #[serde(default)]
    pub include_empty_types: bool,

    /// Leave output files that already exist untouched
    #[serde(default)]
    pub skip_existing: bool,

    /// Separator between namespace path segments
    #[serde(default = "default_namespace_separator")]
    pub namespace_separator: String,

    #[serde(default)]
    pub naming: NamingConfig,

    /// Go type (`time.Time`, `github.com/google/uuid.UUID`, `map`, `any`) to scalar name
    #[serde(default)]
    pub scalars: BTreeMap<String, String>,

    #[serde(default)]
    pub auto_discovery: AutoDiscoveryConfig,

    #[serde(default)]
    pub keep: KeepConfig,
}

fn default_output() -> PathBuf {
    PathBuf::from("graph/schema")
}

fn default_schema_file_name() -> String {
    "schema.graphqls".to_string()
}

fn default_extension() -> String {
    "graphqls".to_string()
}

fn default_true() -> bool {
    true
}

fn default_namespace_separator() -> String {
    "/".to_string()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            output: default_output(),
            strategy: OutputStrategy::default(),
            schema_file_name: default_schema_file_name(),
            extension: default_extension(),
            field_case: FieldCase::default(),
            use_json_tag: true,
            use_gqlgen_directives: false,
            doc_descriptions: true,
            map_id_fields: true,
            include_empty_types: false,
            skip_existing: false,
            namespace_separator: default_namespace_separator(),
            naming: NamingConfig::default(),
            scalars: BTreeMap::new(),
            auto_discovery: AutoDiscoveryConfig::default(),
            keep: KeepConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration from JSON bytes
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_slice(bytes)
    }

    /// Check values that serde defaults cannot guard
    pub fn validate(&self) -> GenResult<()> {
        if self.roots.is_empty() {
            return Err(GenError::Config("at least one root is required".into()));
        }
        if self.roots.iter().any(|r| r.trim().is_empty()) {
            return Err(GenError::Config("roots must not be empty strings".into()));
        }
        if self.schema_file_name.trim().is_empty() {
            return Err(GenError::Config("schema_file_name must not be empty".into()));
        }
        if self.extension.trim().is_empty() || self.extension.starts_with('.') {
            return Err(GenError::Config(
                "extension must be non-empty and given without a leading dot".into(),
            ));
        }
        if self.namespace_separator.is_empty() {
            return Err(GenError::Config("namespace_separator must not be empty".into()));
        }
        if self.naming.input_token.is_empty() {
            return Err(GenError::Config("naming.input_token must not be empty".into()));
        }

        let begin = self.keep.begin_marker.trim();
        let end = self.keep.end_marker.trim();
        if begin.is_empty() || end.is_empty() {
            return Err(GenError::Config("keep markers must not be empty".into()));
        }
        if begin == end {
            return Err(GenError::Config(
                "keep begin and end markers must differ".into(),
            ));
        }
        if begin.contains('\n') || end.contains('\n') {
            return Err(GenError::Config("keep markers must be single lines".into()));
        }

        if self.auto_discovery.strategy == DiscoveryStrategy::Patterns
            && self.auto_discovery.patterns.is_empty()
        {
            return Err(GenError::Config(
                "auto_discovery.strategy = \"patterns\" requires auto_discovery.patterns".into(),
            ));
        }

        for (go_type, scalar) in &self.scalars {
            if go_type.trim().is_empty() || scalar.trim().is_empty() {
                return Err(GenError::Config(format!(
                    "invalid scalar mapping `{go_type}` = `{scalar}`"
                )));
            }
        }

        Ok(())
    }
}

macro_rules! impl_keyword_enum {
    ($ty:ty, $what:literal, { $($text:literal $(| $alias:literal)* => $variant:expr),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text $(| $alias)* => Ok($variant),)+
                    other => Err(format!(concat!("unknown ", $what, ": {}"), other)),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                $(if *self == $variant {
                    return f.write_str($text);
                })+
                Ok(())
            }
        }
    };
}

impl_keyword_enum!(OutputStrategy, "output strategy", {
    "single" => OutputStrategy::Single,
    "multiple" => OutputStrategy::Multiple,
    "package" | "namespace" => OutputStrategy::Package,
});

impl_keyword_enum!(FieldCase, "field case", {
    "camel" => FieldCase::Camel,
    "snake" => FieldCase::Snake,
    "pascal" => FieldCase::Pascal,
    "original" | "none" => FieldCase::Original,
});

impl_keyword_enum!(DiscoveryStrategy, "discovery strategy", {
    "none" => DiscoveryStrategy::None,
    "referenced" => DiscoveryStrategy::Referenced,
    "all" => DiscoveryStrategy::All,
    "patterns" => DiscoveryStrategy::Patterns,
});

impl_keyword_enum!(KeepPosition, "keep position", {
    "top" => KeepPosition::Top,
    "bottom" => KeepPosition::Bottom,
});

#[cfg(test)]
#[path = "config/config_tests.rs"]
mod config_tests;
