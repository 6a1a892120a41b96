//! gqlforge-codegen - GraphQL schema synthesis from annotated Go types
//!
//! The pipeline, in order:
//! - [`scanner`] expands root specifiers and parses Go files with tree-sitter
//! - [`annotate`] interprets `@gql...` doc directives and `gql:"..."` tags
//! - [`resolver`] flattens embeddings, instantiates generics, links enums,
//!   runs auto-discovery and lowers everything into [`SchemaBlock`]s
//! - [`output`] groups blocks into files, keeps hand-edited regions and writes
//!
//! [`Generator`] drives all of it from a [`gqlforge_core::GeneratorConfig`].
//!
//! ## Annotating Go types
//!
//! ```go
//! // User of the shop.
//! // @gqlType
//! // @gqlInput(name: "SignupInput", ignoreAll)
//! type User struct {
//!     Base
//!     ID       string `json:"id" gql:",include:SignupInput"`
//!     Password string `gql:",wo,include:SignupInput"`
//! }
//! ```

pub mod annotate;
pub mod directive;
pub mod discovery;
pub mod enums;
pub mod gomod;
pub mod ir;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod preserve;
pub mod registry;
pub mod render;
pub mod resolver;
pub mod roots;
pub mod scanner;
pub mod source;
pub mod tag;

pub use ir::{ArtifactKind, SchemaBlock};
pub use output::{FileStatus, PlannedFile};
pub use pipeline::{FileReport, GenerationReport, Generator, resolve_files};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{ArtifactKind, FileStatus, GenerationReport, Generator, SchemaBlock};
    pub use gqlforge_core::prelude::*;
}
