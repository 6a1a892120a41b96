//! Error types for schema generation

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for generation operations
pub type GenResult<T> = Result<T, GenError>;

/// Broad class of a [`GenError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A source file could not be parsed
    Scan,
    /// An annotation or struct tag is malformed
    Directive,
    /// A reference, embedding or enum value could not be resolved
    Resolution,
    /// Two outputs resolve to the same name
    Naming,
    /// Reading or writing the filesystem failed
    Io,
    /// The configuration is invalid
    Config,
}

/// Error type for schema generation
///
/// Every variant is fatal: generation stops at the first error rather than
/// emitting partial schema text.
#[derive(Error, Debug)]
pub enum GenError {
    /// Source file contains a syntax error
    #[error("{}:{line}:{column}: syntax error: {message}", path.display())]
    Scan {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// Malformed directive or struct tag
    #[error("{}: invalid {directive} on {owner}: {message}", path.display())]
    Directive {
        path: PathBuf,
        owner: String,
        directive: String,
        message: String,
    },

    /// A field refers to a type that is neither scanned, a scalar, nor discovered
    #[error("unresolved type `{type_name}` for field {owner}.{field}")]
    UnresolvedType {
        owner: String,
        field: String,
        type_name: String,
    },

    /// Embedded structs form a cycle
    #[error("embedding cycle: {}", chain.join(" -> "))]
    EmbeddingCycle { chain: Vec<String> },

    /// Embedding chain exceeds the supported depth
    #[error("embedding of {owner} exceeds depth {limit}")]
    EmbeddingTooDeep { owner: String, limit: usize },

    /// A constant is annotated as an enum value but its type is not an enum
    #[error("{}: enum value {constant} is not linked to an enum (declared type `{type_name}`)", path.display())]
    OrphanEnumValue {
        path: PathBuf,
        constant: String,
        type_name: String,
    },

    /// An enum has no linked constants
    #[error("enum {name} has no values")]
    EmptyEnum { name: String },

    /// Two fields of one output block share a name
    #[error("duplicate field `{name}` in {artifact}: from {first} and {second}")]
    FieldCollision {
        artifact: String,
        name: String,
        first: String,
        second: String,
    },

    /// Two output blocks (or output files) share a name
    #[error("duplicate schema name `{name}`: from {first} and {second}")]
    ArtifactCollision {
        name: String,
        first: String,
        second: String,
    },

    /// Filesystem error with the offending path
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An existing output file has unbalanced keep markers
    #[error("{}: malformed preserved region: {message}", path.display())]
    PreservedRegion { path: PathBuf, message: String },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl GenError {
    /// Wrap an I/O error with the path it concerns
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        GenError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Returns the class of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenError::Scan { .. } => ErrorKind::Scan,
            GenError::Directive { .. } => ErrorKind::Directive,
            GenError::UnresolvedType { .. }
            | GenError::EmbeddingCycle { .. }
            | GenError::EmbeddingTooDeep { .. }
            | GenError::OrphanEnumValue { .. }
            | GenError::EmptyEnum { .. } => ErrorKind::Resolution,
            GenError::FieldCollision { .. } | GenError::ArtifactCollision { .. } => {
                ErrorKind::Naming
            }
            GenError::Io { .. } | GenError::PreservedRegion { .. } => ErrorKind::Io,
            GenError::Config(_) => ErrorKind::Config,
        }
    }

    /// Returns the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::Config => 2,
            ErrorKind::Scan => 3,
            ErrorKind::Directive => 4,
            ErrorKind::Resolution => 5,
            ErrorKind::Naming => 6,
            ErrorKind::Io => 7,
        }
    }
}
