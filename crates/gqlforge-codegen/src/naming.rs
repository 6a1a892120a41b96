//! Naming convention utilities for schema generation.
//!
//! Every function here is pure: it takes a raw Go identifier plus the
//! relevant slice of configuration and returns the final schema identifier.
//!
//! # Supported Conversions
//!
//! | Input | Function | Output |
//! |-------|----------|--------|
//! | `UserID` | [`to_camel_case`] | `userId` |
//! | `UserID` | [`to_pascal_case`] | `UserId` |
//! | `UserID` | [`to_snake_case`] | `user_id` |
//! | `StatusActive` | [`enum_value_name`] (base `Status`) | `ACTIVE` |
//! | `UserDTO` | [`derive_type_name`] (strip `DTO`, input) | `UserInput` |

use crate::ir::ArtifactKind;
use gqlforge_core::{FieldCase, NamingConfig};

/// Split an identifier into words.
///
/// Boundaries fall on lower-to-upper transitions, before the last capital of
/// an acronym run that is followed by a lowercase letter, and on `_`, `-` or
/// whitespace. Digits stay attached to the word they follow.
///
/// # Examples
///
/// ```
/// use gqlforge_codegen::naming::split_words;
///
/// assert_eq!(split_words("UserID"), vec!["User", "ID"]);
/// assert_eq!(split_words("HTTPServer"), vec!["HTTP", "Server"]);
/// assert_eq!(split_words("created_at"), vec!["created", "at"]);
/// ```
pub fn split_words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if !current.is_empty() && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
}

/// Capitalize the first letter and lowercase the rest.
fn title_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
    }
}

/// Convert an identifier to lowerCamelCase.
///
/// # Examples
///
/// ```
/// use gqlforge_codegen::naming::to_camel_case;
///
/// assert_eq!(to_camel_case("UserID"), "userId");
/// assert_eq!(to_camel_case("ID"), "id");
/// assert_eq!(to_camel_case("created_at"), "createdAt");
/// ```
pub fn to_camel_case(s: &str) -> String {
    let mut result = String::new();
    for (i, word) in split_words(s).iter().enumerate() {
        if i == 0 {
            result.push_str(&word.to_lowercase());
        } else {
            result.push_str(&title_word(word));
        }
    }
    result
}

/// Convert an identifier to UpperCamelCase.
pub fn to_pascal_case(s: &str) -> String {
    split_words(s).iter().map(|w| title_word(w)).collect()
}

/// Convert an identifier to snake_case.
pub fn to_snake_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Convert an identifier to UPPER_SNAKE_CASE.
pub fn to_upper_snake_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| w.to_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Apply a configured field case style.
pub fn apply_field_case(s: &str, case: FieldCase) -> String {
    match case {
        FieldCase::Camel => to_camel_case(s),
        FieldCase::Snake => to_snake_case(s),
        FieldCase::Pascal => to_pascal_case(s),
        FieldCase::Original => s.to_string(),
    }
}

/// Remove the first matching prefix.
///
/// Only one entry is applied, and an entry equal to the whole name never
/// matches, so the result is never empty.
pub fn strip_prefix_once<'a>(name: &'a str, prefixes: &[String]) -> &'a str {
    prefixes
        .iter()
        .filter(|p| !p.is_empty())
        .find_map(|p| name.strip_prefix(p.as_str()).filter(|rest| !rest.is_empty()))
        .unwrap_or(name)
}

/// Remove the first matching suffix; never strips to empty.
pub fn strip_suffix_once<'a>(name: &'a str, suffixes: &[String]) -> &'a str {
    suffixes
        .iter()
        .filter(|s| !s.is_empty())
        .find_map(|s| name.strip_suffix(s.as_str()).filter(|rest| !rest.is_empty()))
        .unwrap_or(name)
}

/// Derive the schema name of a type, input or enum.
///
/// A custom name bypasses every other step. Otherwise: strip one prefix,
/// strip one suffix, append the input token for inputs, then add the
/// role's configured prefix and suffix.
///
/// # Examples
///
/// ```
/// use gqlforge_codegen::ir::ArtifactKind;
/// use gqlforge_codegen::naming::derive_type_name;
/// use gqlforge_core::NamingConfig;
///
/// let naming = NamingConfig {
///     strip_suffixes: vec!["DTO".to_string()],
///     type_prefix: "Gql".to_string(),
///     ..NamingConfig::default()
/// };
///
/// assert_eq!(derive_type_name("UserDTO", None, ArtifactKind::Type, &naming), "GqlUser");
/// assert_eq!(derive_type_name("UserDTO", None, ArtifactKind::Input, &naming), "UserInput");
/// assert_eq!(derive_type_name("UserDTO", Some("Account"), ArtifactKind::Type, &naming), "Account");
/// ```
pub fn derive_type_name(
    go_name: &str,
    custom: Option<&str>,
    kind: ArtifactKind,
    naming: &NamingConfig,
) -> String {
    if let Some(custom) = custom {
        return custom.to_string();
    }

    let stripped = strip_prefix_once(go_name, &naming.strip_prefixes);
    let stripped = strip_suffix_once(stripped, &naming.strip_suffixes);

    match kind {
        ArtifactKind::Input => format!(
            "{}{}{}{}",
            naming.input_prefix, stripped, naming.input_token, naming.input_suffix
        ),
        ArtifactKind::Type | ArtifactKind::Enum => {
            format!("{}{}{}", naming.type_prefix, stripped, naming.type_suffix)
        }
    }
}

/// Resolve the schema name of a field.
///
/// Priority: explicit tag name, then the JSON tag name when `use_json_tag`
/// is set, then the case-transformed Go name.
pub fn resolve_field_name(
    go_name: &str,
    tag_name: Option<&str>,
    json_name: Option<&str>,
    use_json_tag: bool,
    case: FieldCase,
) -> String {
    if let Some(name) = tag_name.filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    if use_json_tag && let Some(name) = json_name.filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    apply_field_case(go_name, case)
}

/// Display name of an enum value.
///
/// The base type name is stripped as a prefix when something remains,
/// then the rest is upper-snake-cased.
///
/// # Examples
///
/// ```
/// use gqlforge_codegen::naming::enum_value_name;
///
/// assert_eq!(enum_value_name("StatusPendingReview", "Status"), "PENDING_REVIEW");
/// assert_eq!(enum_value_name("Archived", "Status"), "ARCHIVED");
/// ```
pub fn enum_value_name(const_name: &str, base_type: &str) -> String {
    let rest = const_name
        .strip_prefix(base_type)
        .filter(|rest| !rest.is_empty())
        .map(|rest| rest.trim_start_matches('_'))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(const_name);
    to_upper_snake_case(rest)
}

/// Instantiation name fragment contributed by one generic argument.
pub fn generic_fragment(base: &str, list_depth: usize) -> String {
    let mut fragment = to_pascal_case_preserving(base);
    for _ in 0..list_depth {
        fragment.push_str("List");
    }
    fragment
}

/// Uppercase the first letter and keep the rest unchanged.
pub fn to_pascal_case_preserving(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

#[cfg(test)]
#[path = "naming/naming_tests.rs"]
mod naming_tests;
