#![allow(non_snake_case)]

use super::*;

fn valid_config() -> GeneratorConfig {
    GeneratorConfig {
        roots: vec!["./models".to_string()],
        ..GeneratorConfig::default()
    }
}

#[test]
fn GeneratorConfig___default___has_expected_values() {
    let config = GeneratorConfig::default();

    assert!(config.roots.is_empty());
    assert_eq!(config.output, PathBuf::from("graph/schema"));
    assert_eq!(config.strategy, OutputStrategy::Single);
    assert_eq!(config.schema_file_name, "schema.graphqls");
    assert_eq!(config.extension, "graphqls");
    assert_eq!(config.field_case, FieldCase::Camel);
    assert!(config.use_json_tag);
    assert!(!config.use_gqlgen_directives);
    assert!(config.doc_descriptions);
    assert_eq!(config.naming.input_token, "Input");
    assert_eq!(config.auto_discovery.strategy, DiscoveryStrategy::None);
    assert_eq!(config.auto_discovery.max_depth, 3);
    assert_eq!(config.keep.begin_marker, "# @gqlKeepBegin");
    assert_eq!(config.keep.end_marker, "# @gqlKeepEnd");
    assert_eq!(config.keep.position, KeepPosition::Bottom);
}

#[test]
fn GeneratorConfig___from_empty_bytes___returns_defaults() {
    let config = GeneratorConfig::from_json(&[]).unwrap();

    assert_eq!(config, GeneratorConfig::default());
}

#[test]
fn GeneratorConfig___from_json___fills_missing_sections_with_defaults() {
    let json = r#"{"roots": ["./models/..."], "naming": {"strip_suffixes": ["DTO"]}}"#;

    let config = GeneratorConfig::from_json(json.as_bytes()).unwrap();

    assert_eq!(config.roots, vec!["./models/..."]);
    assert_eq!(config.naming.strip_suffixes, vec!["DTO"]);
    assert_eq!(config.naming.input_token, "Input");
    assert_eq!(config.keep, KeepConfig::default());
}

#[test]
fn GeneratorConfig___from_json___parses_enums_lowercase() {
    let json = r#"{
        "strategy": "package",
        "field_case": "snake",
        "auto_discovery": {"strategy": "referenced", "max_depth": 0},
        "keep": {"position": "top"}
    }"#;

    let config = GeneratorConfig::from_json(json.as_bytes()).unwrap();

    assert_eq!(config.strategy, OutputStrategy::Package);
    assert_eq!(config.field_case, FieldCase::Snake);
    assert_eq!(config.auto_discovery.strategy, DiscoveryStrategy::Referenced);
    assert_eq!(config.auto_discovery.max_depth, 0);
    assert_eq!(config.keep.position, KeepPosition::Top);
}

#[test]
fn GeneratorConfig___from_json___accepts_none_as_original_case() {
    let config = GeneratorConfig::from_json(br#"{"field_case": "none"}"#).unwrap();

    assert_eq!(config.field_case, FieldCase::Original);
}

#[test]
fn GeneratorConfig___from_json___rejects_unknown_strategy() {
    let result = GeneratorConfig::from_json(br#"{"strategy": "sharded"}"#);

    assert!(result.is_err());
}

#[test]
fn GeneratorConfig___validate___accepts_minimal_config() {
    assert!(valid_config().validate().is_ok());
}

#[test]
fn GeneratorConfig___validate___requires_roots() {
    let config = GeneratorConfig::default();

    let err = config.validate().unwrap_err();

    assert!(err.to_string().contains("root"));
}

#[test]
fn GeneratorConfig___validate___rejects_identical_markers() {
    let mut config = valid_config();
    config.keep.end_marker = config.keep.begin_marker.clone();

    assert!(config.validate().is_err());
}

#[test]
fn GeneratorConfig___validate___rejects_dotted_extension() {
    let mut config = valid_config();
    config.extension = ".graphql".to_string();

    assert!(config.validate().is_err());
}

#[test]
fn GeneratorConfig___validate___patterns_strategy_needs_patterns() {
    let mut config = valid_config();
    config.auto_discovery.strategy = DiscoveryStrategy::Patterns;

    assert!(config.validate().is_err());

    config.auto_discovery.patterns = vec!["*DTO".to_string()];
    assert!(config.validate().is_ok());
}

#[test]
fn GeneratorConfig___validate___rejects_blank_scalar_mapping() {
    let mut config = valid_config();
    config.scalars.insert("time.Time".to_string(), " ".to_string());

    assert!(matches!(config.validate(), Err(GenError::Config(_))));
}

#[test]
fn OutputStrategy___display___round_trips_through_from_str() {
    for strategy in [
        OutputStrategy::Single,
        OutputStrategy::Multiple,
        OutputStrategy::Package,
    ] {
        assert_eq!(strategy.to_string().parse::<OutputStrategy>(), Ok(strategy));
    }
}
