//! gqlforge-core - Configuration and error types
//!
//! This crate provides the plain-data types shared by the gqlforge pipeline
//! and its hosts:
//! - [`GeneratorConfig`] and its sections for naming, discovery and keep regions
//! - [`GenError`] / [`GenResult`] for fail-fast error reporting

mod config;
mod error;

pub use config::{
    AutoDiscoveryConfig, DiscoveryStrategy, FieldCase, GeneratorConfig, KeepConfig, KeepPosition,
    NamingConfig, OutputStrategy,
};
pub use error::{ErrorKind, GenError, GenResult};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        DiscoveryStrategy, FieldCase, GenError, GenResult, GeneratorConfig, KeepPosition,
        NamingConfig, OutputStrategy,
    };
}
