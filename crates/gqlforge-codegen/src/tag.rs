//! Go struct tag interpretation.
//!
//! A field tag such as
//!
//! ```text
//! `json:"user_id,omitempty" gql:"id,ro,description:'Primary key',ignore:[AdminView]"`
//! ```
//!
//! is split with Go's `key:"value"` convention, then the `json` and `gql`
//! values are interpreted. The `gql` value is a compact comma list: the
//! first bare word that is not a known flag is the field name, other items
//! are flags (`ro`, `wo`, `rw`, `forceResolver`, `optional`, `required`,
//! `ignore`, `omit`, `include`, `deprecated`) or `key:value` pairs using the
//! same value syntax as directives. A lone `-` hides the field everywhere.

use crate::directive::{Cursor, ParamValue, normalize_key};
use crate::ir::{FieldOptions, JsonTag, Nullability};

/// Interpreted tags of one field
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldTags {
    pub json: JsonTag,
    pub options: FieldOptions,
}

/// Split a raw struct tag into `(key, value)` pairs.
///
/// Follows `reflect.StructTag`: space separated `key:"value"` entries where
/// the value is a double-quoted string with backslash escapes.
pub fn split_struct_tag(tag: &str) -> Result<Vec<(String, String)>, String> {
    let mut pairs = Vec::new();
    let mut chars = tag.char_indices().peekable();

    loop {
        while chars.peek().is_some_and(|(_, c)| *c == ' ') {
            chars.next();
        }
        let Some(&(start, _)) = chars.peek() else {
            return Ok(pairs);
        };

        let mut key_end = start;
        while let Some(&(i, c)) = chars.peek() {
            if c == ':' || c == '"' || c <= ' ' {
                break;
            }
            key_end = i + c.len_utf8();
            chars.next();
        }
        if key_end == start {
            return Err(format!("malformed struct tag `{tag}`: empty key"));
        }
        let key = &tag[start..key_end];

        if chars.next().map(|(_, c)| c) != Some(':') || chars.next().map(|(_, c)| c) != Some('"') {
            return Err(format!("malformed struct tag `{tag}`: expected `{key}:\"...\"`"));
        }

        let mut value = String::new();
        loop {
            match chars.next() {
                None => return Err(format!("malformed struct tag `{tag}`: unterminated value")),
                Some((_, '\\')) => match chars.next() {
                    Some((_, c)) => value.push(c),
                    None => {
                        return Err(format!("malformed struct tag `{tag}`: unterminated value"));
                    }
                },
                Some((_, '"')) => break,
                Some((_, c)) => value.push(c),
            }
        }
        pairs.push((key.to_string(), value));
    }
}

/// Interpret a `json:"..."` value
pub fn parse_json_tag(value: &str) -> JsonTag {
    if value == "-" {
        return JsonTag {
            name: None,
            skip: true,
        };
    }
    let name = value.split(',').next().unwrap_or_default();
    JsonTag {
        name: (!name.is_empty()).then(|| name.to_string()),
        skip: false,
    }
}

const BARE_FLAGS: &[&str] = &[
    "ro",
    "wo",
    "rw",
    "ignore",
    "omit",
    "include",
    "deprecated",
    "forceresolver",
    "optional",
    "required",
];

/// Interpret a `gql:"..."` value
pub fn parse_gql_tag(value: &str) -> Result<FieldOptions, String> {
    let mut options = FieldOptions::default();
    if value.trim() == "-" {
        options.hard_ignore = true;
        return Ok(options);
    }

    let mut cur = Cursor::new(value);
    let mut index = 0usize;
    loop {
        cur.skip_ws();
        if cur.is_eof() {
            break;
        }

        if cur.peek() == Some(',') {
            // empty leading item: `gql:",ro"`
            cur.bump();
            index += 1;
            continue;
        }

        let item_start = cur.pos();
        let word = read_word(&mut cur);
        cur.skip_ws();

        if cur.peek() == Some(':') {
            cur.bump();
            let (value, raw) = cur.value(&[','])?;
            apply_keyed(&mut options, &normalize_key(&word), value, raw)?;
        } else if word.is_empty() {
            let (value, raw) = cur.value(&[','])?;
            if index != 0 {
                return Err(format!("unexpected value `{raw}`"));
            }
            options.name = value.as_text();
        } else if BARE_FLAGS.contains(&normalize_key(&word).as_str()) {
            apply_keyed(&mut options, &normalize_key(&word), ParamValue::Flag, word)?;
        } else if index == 0 {
            options.name = Some(word);
        } else {
            return Err(format!("unknown option `{}`", &value[item_start..cur.pos()].trim()));
        }

        index += 1;
        cur.skip_ws();
        match cur.peek() {
            None => break,
            Some(',') => {
                cur.bump();
            }
            Some(c) => return Err(format!("expected `,`, found `{c}`")),
        }
    }

    if options.read_only && options.write_only {
        return Err("`ro` and `wo` are mutually exclusive".to_string());
    }

    Ok(options)
}

fn read_word(cur: &mut Cursor<'_>) -> String {
    let mut word = String::new();
    while let Some(c) = cur.peek() {
        if c.is_alphanumeric() || c == '_' || c == '-' {
            word.push(c);
            cur.bump();
        } else {
            break;
        }
    }
    word
}

fn apply_keyed(
    options: &mut FieldOptions,
    key: &str,
    value: ParamValue,
    raw: String,
) -> Result<(), String> {
    match key {
        "name" => options.name = value.as_text(),
        "type" => {
            let text = if raw.starts_with(['"', '\'']) {
                value.as_text().unwrap_or_default()
            } else {
                raw
            };
            if text.trim().is_empty() {
                return Err("`type` needs a value".to_string());
            }
            options.type_override = Some(text);
        }
        "description" => options.description = value.as_text(),
        "deprecated" => options.deprecated = value.as_deprecation(),
        "ignore" | "omit" => options.ignore = Some(value.as_scope()),
        "include" => options.include = Some(value.as_scope()),
        "ro" => options.read_only = value.as_bool(),
        "wo" => options.write_only = value.as_bool(),
        "rw" => {
            if value.as_bool() {
                options.read_only = false;
                options.write_only = false;
            }
        }
        "forceresolver" => options.force_resolver = value.as_bool(),
        "optional" => {
            if value.as_bool() {
                options.nullability = Some(Nullability::Optional);
            }
        }
        "required" => {
            if value.as_bool() {
                options.nullability = Some(Nullability::Required);
            }
        }
        other => return Err(format!("unknown option `{other}`")),
    }
    Ok(())
}

/// Interpret the complete raw tag of a field
pub fn parse_field_tags(raw: Option<&str>) -> Result<FieldTags, String> {
    let Some(raw) = raw else {
        return Ok(FieldTags::default());
    };

    let mut tags = FieldTags::default();
    for (key, value) in split_struct_tag(raw)? {
        match key.as_str() {
            "json" => tags.json = parse_json_tag(&value),
            "gql" => tags.options = parse_gql_tag(&value)?,
            _ => {}
        }
    }
    Ok(tags)
}
