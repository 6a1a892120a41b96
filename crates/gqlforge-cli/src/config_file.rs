//! Configuration file loading and command-line overrides

use gqlforge_core::{GenError, GeneratorConfig, OutputStrategy};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "gqlforge.toml";

/// Values given on the command line, applied on top of the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub roots: Vec<String>,
    pub output: Option<PathBuf>,
    pub strategy: Option<OutputStrategy>,
}

impl Overrides {
    pub fn apply(self, config: &mut GeneratorConfig) {
        if !self.roots.is_empty() {
            config.roots = self.roots;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
    }
}

/// Parse configuration text; `.json` files use JSON, everything else TOML
pub fn parse(path: &Path, content: &str) -> Result<GeneratorConfig, GenError> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        GeneratorConfig::from_json(content.as_bytes())
            .map_err(|e| GenError::Config(format!("{}: {e}", path.display())))
    } else {
        toml::from_str(content).map_err(|e| GenError::Config(format!("{}: {e}", path.display())))
    }
}

/// Read a configuration file
pub fn from_file(path: &Path) -> Result<GeneratorConfig, GenError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| GenError::Config(format!("cannot read {}: {e}", path.display())))?;
    parse(path, &content)
}

/// Load the effective configuration.
///
/// An explicit path must exist. Without one, `gqlforge.toml` in `dir` is
/// used when present, otherwise the defaults. Overrides are applied last,
/// then the result is validated.
pub fn load(
    explicit: Option<&Path>,
    dir: &Path,
    overrides: Overrides,
) -> Result<GeneratorConfig, GenError> {
    let mut config = match explicit {
        Some(path) => {
            debug!(path = %path.display(), "loading configuration");
            from_file(path)?
        }
        None => {
            let default_path = dir.join(DEFAULT_CONFIG_FILE);
            if default_path.is_file() {
                debug!(path = %default_path.display(), "loading configuration");
                from_file(&default_path)?
            } else {
                debug!("no configuration file, using defaults");
                GeneratorConfig::new()
            }
        }
    };

    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
#[path = "config_file/config_file_tests.rs"]
mod config_file_tests;
