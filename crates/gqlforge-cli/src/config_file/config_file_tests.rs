#![allow(non_snake_case)]

use super::*;
use gqlforge_core::{DiscoveryStrategy, ErrorKind, KeepPosition};
use std::fs;
use tempfile::TempDir;

const FULL_TOML: &str = r#"
roots = ["./models/..."]
output = "graph/schema"
strategy = "package"
field_case = "snake"
use_gqlgen_directives = true

[naming]
strip_suffixes = ["DTO"]
input_suffix = "Payload"

[scalars]
"time.Time" = "DateTime"

[auto_discovery]
strategy = "referenced"
max_depth = 2

[keep]
position = "top"
"#;

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn parse___full_toml___reads_every_section() {
    let config = parse(Path::new("gqlforge.toml"), FULL_TOML).unwrap();

    assert_eq!(config.roots, vec!["./models/..."]);
    assert_eq!(config.strategy, OutputStrategy::Package);
    assert!(config.use_gqlgen_directives);
    assert_eq!(config.naming.strip_suffixes, vec!["DTO"]);
    assert_eq!(config.naming.input_token, "Input");
    assert_eq!(config.scalars["time.Time"], "DateTime");
    assert_eq!(config.auto_discovery.strategy, DiscoveryStrategy::Referenced);
    assert_eq!(config.auto_discovery.max_depth, 2);
    assert_eq!(config.keep.position, KeepPosition::Top);
    assert_eq!(config.keep.begin_marker, "# @gqlKeepBegin");
}

#[test]
fn parse___json_extension___uses_json() {
    let config = parse(
        Path::new("gqlforge.json"),
        r#"{"roots": ["models"], "strategy": "multiple"}"#,
    )
    .unwrap();

    assert_eq!(config.roots, vec!["models"]);
    assert_eq!(config.strategy, OutputStrategy::Multiple);
}

#[test]
fn parse___unknown_strategy___config_error() {
    let err = parse(Path::new("gqlforge.toml"), "strategy = \"sideways\"\n").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Config);
    assert!(err.to_string().contains("gqlforge.toml"));
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn load___default_file_in_dir___is_picked_up() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(DEFAULT_CONFIG_FILE), FULL_TOML).unwrap();

    let config = load(None, dir.path(), Overrides::default()).unwrap();

    assert_eq!(config.strategy, OutputStrategy::Package);
}

#[test]
fn load___no_file_and_no_roots___fails_validation() {
    let dir = TempDir::new().unwrap();

    let err = load(None, dir.path(), Overrides::default()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn load___missing_explicit_file___config_error() {
    let dir = TempDir::new().unwrap();

    let err = load(
        Some(&dir.path().join("nope.toml")),
        dir.path(),
        Overrides::default(),
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn load___overrides_replace_file_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    fs::write(&path, FULL_TOML).unwrap();

    let config = load(
        Some(&path),
        dir.path(),
        Overrides {
            roots: vec!["api/...".to_string(), "dto".to_string()],
            output: Some(PathBuf::from("out")),
            strategy: Some(OutputStrategy::Single),
        },
    )
    .unwrap();

    assert_eq!(config.roots, vec!["api/...", "dto"]);
    assert_eq!(config.output, PathBuf::from("out"));
    assert_eq!(config.strategy, OutputStrategy::Single);
    assert_eq!(config.naming.input_suffix, "Payload");
}

#[test]
fn Overrides___empty___keeps_config() {
    let mut config = parse(Path::new("gqlforge.toml"), FULL_TOML).unwrap();
    let before = config.clone();

    Overrides::default().apply(&mut config);

    assert_eq!(config, before);
}
