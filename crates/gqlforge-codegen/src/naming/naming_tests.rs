#![allow(non_snake_case)]

use super::*;

fn naming() -> NamingConfig {
    NamingConfig::default()
}

#[test]
fn split_words___splits_case_transitions() {
    assert_eq!(split_words("createdAt"), vec!["created", "At"]);
    assert_eq!(split_words("UserProfile"), vec!["User", "Profile"]);
}

#[test]
fn split_words___keeps_acronym_runs_together() {
    assert_eq!(split_words("UserID"), vec!["User", "ID"]);
    assert_eq!(split_words("HTTPServer"), vec!["HTTP", "Server"]);
    assert_eq!(split_words("ID"), vec!["ID"]);
}

#[test]
fn split_words___attaches_digits_to_preceding_word() {
    assert_eq!(split_words("Base64Encode"), vec!["Base64", "Encode"]);
    assert_eq!(split_words("userID2"), vec!["user", "ID2"]);
}

#[test]
fn split_words___treats_separators_as_boundaries() {
    assert_eq!(split_words("created_at"), vec!["created", "at"]);
    assert_eq!(split_words("first-name"), vec!["first", "name"]);
    assert_eq!(split_words("__x__"), vec!["x"]);
    assert!(split_words("").is_empty());
}

#[test]
fn to_camel_case___lowercases_leading_acronym() {
    assert_eq!(to_camel_case("ID"), "id");
    assert_eq!(to_camel_case("URLPath"), "urlPath");
    assert_eq!(to_camel_case("UserID"), "userId");
}

#[test]
fn to_snake_case___joins_lowercase_words() {
    assert_eq!(to_snake_case("UserProfileDTO"), "user_profile_dto");
    assert_eq!(to_snake_case("PageUser"), "page_user");
}

#[test]
fn apply_field_case___original_keeps_go_name() {
    assert_eq!(apply_field_case("UserID", FieldCase::Original), "UserID");
}

#[test]
fn strip_prefix_once___strips_first_match_only() {
    let prefixes = vec!["Api".to_string(), "ApiV1".to_string()];

    assert_eq!(strip_prefix_once("ApiV1User", &prefixes), "V1User");
}

#[test]
fn strip_prefix_once___never_strips_to_empty() {
    let prefixes = vec!["DTO".to_string()];

    assert_eq!(strip_prefix_once("DTO", &prefixes), "DTO");
}

#[test]
fn strip_suffix_once___does_not_chain_entries() {
    let suffixes = vec!["DTO".to_string(), "Model".to_string()];

    assert_eq!(strip_suffix_once("UserModelDTO", &suffixes), "UserModel");
}

#[test]
fn derive_type_name___scenario_strip_suffix_and_type_prefix() {
    let naming = NamingConfig {
        strip_suffixes: vec!["DTO".to_string()],
        type_prefix: "Gql".to_string(),
        ..naming()
    };

    assert_eq!(
        derive_type_name("UserDTO", None, ArtifactKind::Type, &naming),
        "GqlUser"
    );
}

#[test]
fn derive_type_name___scenario_input_token_before_input_suffix() {
    let naming = NamingConfig {
        strip_suffixes: vec!["DTO".to_string()],
        input_suffix: "Payload".to_string(),
        ..naming()
    };

    assert_eq!(
        derive_type_name("UserDTO", None, ArtifactKind::Input, &naming),
        "UserInputPayload"
    );
}

#[test]
fn derive_type_name___custom_name_bypasses_all_steps() {
    let naming = NamingConfig {
        strip_suffixes: vec!["DTO".to_string()],
        input_prefix: "X".to_string(),
        ..naming()
    };

    assert_eq!(
        derive_type_name("UserDTO", Some("NewUserDTO"), ArtifactKind::Input, &naming),
        "NewUserDTO"
    );
}

#[test]
fn derive_type_name___enums_use_type_lists() {
    let naming = NamingConfig {
        type_suffix: "Kind".to_string(),
        input_suffix: "Ignored".to_string(),
        ..naming()
    };

    assert_eq!(
        derive_type_name("Status", None, ArtifactKind::Enum, &naming),
        "StatusKind"
    );
}

#[test]
fn derive_type_name___does_not_restrip_added_affixes() {
    let naming = NamingConfig {
        strip_prefixes: vec!["Gql".to_string()],
        type_prefix: "Gql".to_string(),
        ..naming()
    };

    assert_eq!(
        derive_type_name("GqlUser", None, ArtifactKind::Type, &naming),
        "GqlUser"
    );
}

#[test]
fn resolve_field_name___tag_name_wins() {
    let name = resolve_field_name("UserID", Some("uid"), Some("user_id"), true, FieldCase::Camel);

    assert_eq!(name, "uid");
}

#[test]
fn resolve_field_name___json_name_used_when_enabled() {
    assert_eq!(
        resolve_field_name("UserID", None, Some("user_id"), true, FieldCase::Camel),
        "user_id"
    );
    assert_eq!(
        resolve_field_name("UserID", None, Some("user_id"), false, FieldCase::Camel),
        "userId"
    );
}

#[test]
fn resolve_field_name___empty_names_fall_through() {
    assert_eq!(
        resolve_field_name("UserID", Some(""), Some(""), true, FieldCase::Snake),
        "user_id"
    );
}

#[test]
fn enum_value_name___strips_base_type_prefix() {
    assert_eq!(enum_value_name("StatusActive", "Status"), "ACTIVE");
    assert_eq!(enum_value_name("Status_ON_HOLD", "Status"), "ON_HOLD");
}

#[test]
fn enum_value_name___keeps_name_when_prefix_absent_or_whole() {
    assert_eq!(enum_value_name("Archived", "Status"), "ARCHIVED");
    assert_eq!(enum_value_name("Status", "Status"), "STATUS");
}

#[test]
fn generic_fragment___appends_list_per_depth() {
    assert_eq!(generic_fragment("User", 0), "User");
    assert_eq!(generic_fragment("T", 1), "TList");
    assert_eq!(generic_fragment("string", 2), "StringListList");
}
