//! Annotation micro-language parser.
//!
//! Doc comments carry directives of the shape
//!
//! ```text
//! @gqlType(name:"Account", description:"A user, with punctuation", ignoreAll)
//! @gqlExtraField(name:"posts", type:"[Post!]!", on:[Account,"AccountInput"])
//! ```
//!
//! Parameters are `key:value`, bare flags, or a leading positional value
//! that binds to `name`. Values are bare tokens, `"..."` / `'...'` strings
//! with backslash escapes, or `[...]` lists. Parsing is a small
//! recursive-descent pass over the comment text; every value keeps its raw
//! source text so `type:[String!]!` survives untouched.

use crate::ir::{Deprecation, Scope};
use thiserror::Error;

/// Value of one directive or tag parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Key present without a value
    Flag,
    Str(String),
    List(Vec<String>),
}

impl ParamValue {
    /// Text value; lists are comma-joined
    pub fn as_text(&self) -> Option<String> {
        match self {
            ParamValue::Flag => None,
            ParamValue::Str(s) => Some(s.clone()),
            ParamValue::List(items) => Some(items.join(",")),
        }
    }

    pub fn as_bool(&self) -> bool {
        match self {
            ParamValue::Flag | ParamValue::List(_) => true,
            ParamValue::Str(s) => !matches!(s.trim().to_ascii_lowercase().as_str(), "false" | "0"),
        }
    }

    /// Scope value: a bare flag covers everything, `""` and `[]` cover nothing,
    /// and `"A,B"` equals `[A,B]`.
    pub fn as_scope(&self) -> Scope {
        match self {
            ParamValue::Flag => Scope::All,
            ParamValue::Str(s) => Scope::from_entries(s.split(',').map(str::to_string).collect()),
            ParamValue::List(items) => Scope::from_entries(items.clone()),
        }
    }

    pub fn as_deprecation(&self) -> Option<Deprecation> {
        match self {
            ParamValue::Flag => Some(Deprecation::default()),
            ParamValue::Str(s) => match s.trim() {
                "false" => None,
                "" | "true" => Some(Deprecation::default()),
                reason => Some(Deprecation {
                    reason: Some(reason.to_string()),
                }),
            },
            ParamValue::List(items) => Some(Deprecation {
                reason: Some(items.join(",")),
            }),
        }
    }
}

/// One bound parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Normalized key: lowercase, underscores removed
    pub key: String,
    pub value: ParamValue,
    /// Source text of the value
    pub raw: String,
}

impl Param {
    /// Value as written, minus surrounding quotes
    pub fn verbatim(&self) -> String {
        if self.raw.starts_with('"') || self.raw.starts_with('\'') {
            self.value.as_text().unwrap_or_default()
        } else {
            self.raw.clone()
        }
    }
}

/// Supported directive kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    Type,
    Input,
    Enum,
    EnumValue,
    IgnoreAll,
    ExtraField,
    Namespace,
}

impl DirectiveKind {
    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "gqltype" => Some(DirectiveKind::Type),
            "gqlinput" => Some(DirectiveKind::Input),
            "gqlenum" => Some(DirectiveKind::Enum),
            "gqlenumvalue" => Some(DirectiveKind::EnumValue),
            "gqlignoreall" => Some(DirectiveKind::IgnoreAll),
            "gqlextrafield" => Some(DirectiveKind::ExtraField),
            "gqlnamespace" => Some(DirectiveKind::Namespace),
            _ => None,
        }
    }

    /// Canonical spelling, for diagnostics
    pub fn display_name(self) -> &'static str {
        match self {
            DirectiveKind::Type => "@gqlType",
            DirectiveKind::Input => "@gqlInput",
            DirectiveKind::Enum => "@gqlEnum",
            DirectiveKind::EnumValue => "@gqlEnumValue",
            DirectiveKind::IgnoreAll => "@gqlIgnoreAll",
            DirectiveKind::ExtraField => "@gqlExtraField",
            DirectiveKind::Namespace => "@gqlNamespace",
        }
    }

    fn keys(self) -> &'static [&'static str] {
        match self {
            DirectiveKind::Type | DirectiveKind::Input => &["name", "description", "ignoreall"],
            DirectiveKind::Enum => &["name", "description"],
            DirectiveKind::EnumValue => &["name", "description", "deprecated"],
            DirectiveKind::IgnoreAll => &[],
            DirectiveKind::ExtraField => &["name", "type", "description", "deprecated", "on"],
            DirectiveKind::Namespace => &["name"],
        }
    }

    fn required(self) -> &'static [&'static str] {
        match self {
            DirectiveKind::ExtraField => &["name", "type"],
            DirectiveKind::Namespace => &["name"],
            _ => &[],
        }
    }

    fn flags(self) -> &'static [&'static str] {
        match self {
            DirectiveKind::Type | DirectiveKind::Input => &["ignoreall"],
            DirectiveKind::EnumValue => &["deprecated"],
            DirectiveKind::ExtraField => &["deprecated", "on"],
            _ => &[],
        }
    }
}

/// A parsed directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub kind: DirectiveKind,
    pub params: Vec<Param>,
    /// Byte offset of `@` in the comment text
    pub offset: usize,
    /// Byte offset one past the directive
    pub end: usize,
}

impl Directive {
    pub fn get(&self, key: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.key == key)
    }

    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(|p| p.value.as_text())
    }

    pub fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(|p| p.value.as_bool())
    }

    pub fn scope(&self, key: &str) -> Option<Scope> {
        self.get(key).map(|p| p.value.as_scope())
    }

    pub fn deprecation(&self, key: &str) -> Option<Deprecation> {
        self.get(key).and_then(|p| p.value.as_deprecation())
    }
}

/// Directive syntax error, before file and owner context are attached
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{directive}: {message}")]
pub struct DirectiveError {
    pub directive: String,
    pub offset: usize,
    pub message: String,
}

/// Directives of one comment block plus the remaining prose
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocBlock {
    pub directives: Vec<Directive>,
    pub prose: Option<String>,
}

/// Character cursor over comment or tag text
pub(crate) struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    pub(crate) fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    pub(crate) fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn slice(&self, start: usize) -> &'a str {
        &self.src[start..self.pos]
    }

    fn ident(&mut self) -> &'a str {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.bump();
        }
        self.slice(start)
    }

    fn quoted(&mut self, quote: char) -> Result<String, String> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err("unterminated string".to_string()),
                Some('\\') => match self.bump() {
                    None => return Err("unterminated string".to_string()),
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(c) => out.push(c),
                },
                Some(c) if c == quote => return Ok(out),
                Some(c) => out.push(c),
            }
        }
    }

    fn list(&mut self) -> Result<Vec<String>, String> {
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                None => return Err("unterminated list".to_string()),
                Some(']') => {
                    self.bump();
                    return Ok(items);
                }
                Some(q @ ('"' | '\'')) => items.push(self.quoted(q)?),
                Some(_) => {
                    // nested `[...]` stays part of the item, as in `[[Int!]!]!`
                    let start = self.pos;
                    let mut depth = 0usize;
                    while let Some(c) = self.peek() {
                        match c {
                            ',' | ']' if depth == 0 => break,
                            '[' => depth += 1,
                            ']' => depth -= 1,
                            '"' | '\'' => {
                                return Err("unexpected character in list item".to_string());
                            }
                            _ => {}
                        }
                        self.bump();
                    }
                    let item = self.slice(start).trim();
                    if !item.is_empty() {
                        items.push(item.to_string());
                    }
                }
            }
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(']') => {}
                None => return Err("unterminated list".to_string()),
                Some(c) => return Err(format!("expected `,` or `]` in list, found `{c}`")),
            }
        }
    }

    /// Read one value, stopping before any of `stops` at nesting depth zero.
    ///
    /// Returns the value and its trimmed source text.
    pub(crate) fn value(&mut self, stops: &[char]) -> Result<(ParamValue, String), String> {
        self.skip_ws();
        let start = self.pos;
        let value = match self.peek() {
            Some(q @ ('"' | '\'')) => ParamValue::Str(self.quoted(q)?),
            Some('[') => {
                let items = self.list()?;
                // `[String!]!` keeps its trailing text in the raw form
                while self.peek().is_some_and(|c| !stops.contains(&c)) {
                    if matches!(self.peek(), Some('"' | '\'' | '[' | '(')) {
                        return Err("unexpected character after list".to_string());
                    }
                    self.bump();
                }
                ParamValue::List(items)
            }
            _ => {
                let mut depth = 0usize;
                while let Some(c) = self.peek() {
                    if depth == 0 && stops.contains(&c) {
                        break;
                    }
                    match c {
                        '(' | '[' => depth += 1,
                        ')' | ']' => {
                            depth = depth
                                .checked_sub(1)
                                .ok_or_else(|| format!("unbalanced `{c}`"))?
                        }
                        '"' | '\'' => return Err("quote inside unquoted value".to_string()),
                        _ => {}
                    }
                    self.bump();
                }
                if depth != 0 {
                    return Err("unbalanced brackets".to_string());
                }
                ParamValue::Str(self.slice(start).trim().to_string())
            }
        };
        let raw = self.slice(start).trim().to_string();
        self.skip_ws();
        Ok((value, raw))
    }
}

/// Lowercase and drop underscores
pub(crate) fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Parameter as written, before binding to a directive's table
struct RawParam {
    key: Option<String>,
    value: ParamValue,
    raw: String,
}

fn parse_params(cur: &mut Cursor<'_>) -> Result<Vec<RawParam>, String> {
    cur.bump();
    let mut params = Vec::new();
    loop {
        cur.skip_ws();
        match cur.peek() {
            None => return Err("unbalanced parenthesis".to_string()),
            Some(')') => {
                cur.bump();
                return Ok(params);
            }
            Some(_) => {}
        }

        let item_start = cur.pos;
        let ident = cur.ident();
        cur.skip_ws();
        let param = if !ident.is_empty() && cur.peek() == Some(':') {
            cur.bump();
            let (value, raw) = cur.value(&[',', ')'])?;
            RawParam {
                key: Some(ident.to_string()),
                value,
                raw,
            }
        } else {
            cur.pos = item_start;
            let (value, raw) = cur.value(&[',', ')'])?;
            RawParam {
                key: None,
                value,
                raw,
            }
        };
        params.push(param);

        cur.skip_ws();
        match cur.peek() {
            Some(',') => {
                cur.bump();
            }
            Some(')') => {}
            None => return Err("unbalanced parenthesis".to_string()),
            Some(c) => return Err(format!("expected `,` or `)`, found `{c}`")),
        }
    }
}

fn bind_params(kind: DirectiveKind, raw_params: Vec<RawParam>) -> Result<Vec<Param>, String> {
    let mut params: Vec<Param> = Vec::new();

    for (index, raw) in raw_params.into_iter().enumerate() {
        let param = match raw.key {
            Some(key) => {
                let key = normalize_key(&key);
                if !kind.keys().contains(&key.as_str()) {
                    return Err(format!("unknown parameter `{key}`"));
                }
                Param {
                    key,
                    value: raw.value,
                    raw: raw.raw,
                }
            }
            None => {
                let is_bare = !raw.raw.starts_with(['"', '\'', '[']);
                let as_flag = normalize_key(&raw.raw);
                if is_bare && kind.flags().contains(&as_flag.as_str()) {
                    Param {
                        key: as_flag,
                        value: ParamValue::Flag,
                        raw: raw.raw,
                    }
                } else if index == 0 && kind.keys().contains(&"name") {
                    Param {
                        key: "name".to_string(),
                        value: raw.value,
                        raw: raw.raw,
                    }
                } else {
                    return Err(format!("unexpected positional value `{}`", raw.raw));
                }
            }
        };

        if params.iter().any(|p| p.key == param.key) {
            return Err(format!("duplicate parameter `{}`", param.key));
        }
        params.push(param);
    }

    for required in kind.required() {
        let present = params
            .iter()
            .any(|p| p.key == *required && p.value.as_text().is_some_and(|t| !t.trim().is_empty()));
        if !present {
            return Err(format!("missing required parameter `{required}`"));
        }
    }

    Ok(params)
}

/// Does `name` look like a directive of this tool
fn looks_like_directive(name: &str) -> bool {
    name.get(..3).is_some_and(|p| p.eq_ignore_ascii_case("gql"))
        && name[3..].starts_with(|c: char| c.is_ascii_uppercase())
}

/// Parse every directive in a comment block.
///
/// Known directive names match case-insensitively. Unknown names of the
/// form `@gqlXxx` are errors; other `@words` are prose.
pub fn parse_directives(text: &str) -> Result<Vec<Directive>, DirectiveError> {
    let mut cur = Cursor::new(text);
    let mut directives = Vec::new();
    let mut prev: Option<char> = None;

    while let Some(c) = cur.peek() {
        let at_boundary = prev.is_none_or(|p| !(p.is_alphanumeric() || p == '_'));
        if c != '@' || !at_boundary {
            prev = cur.bump();
            continue;
        }

        let offset = cur.pos();
        cur.bump();
        let name = cur.ident();
        let Some(kind) = DirectiveKind::from_name(name) else {
            if looks_like_directive(name) {
                return Err(DirectiveError {
                    directive: format!("@{name}"),
                    offset,
                    message: "unknown directive".to_string(),
                });
            }
            prev = name.chars().last().or(Some('@'));
            continue;
        };

        let wrap = |message: String| DirectiveError {
            directive: kind.display_name().to_string(),
            offset,
            message,
        };

        let raw_params = if cur.peek() == Some('(') {
            parse_params(&mut cur).map_err(wrap)?
        } else {
            Vec::new()
        };
        let params = bind_params(kind, raw_params).map_err(wrap)?;

        directives.push(Directive {
            kind,
            params,
            offset,
            end: cur.pos(),
        });
        prev = Some(')');
    }

    Ok(directives)
}

/// Parse a doc comment into directives and the prose left around them
pub fn parse_doc(text: &str) -> Result<DocBlock, DirectiveError> {
    let directives = parse_directives(text)?;

    let mut remaining = String::with_capacity(text.len());
    let mut last = 0;
    for d in &directives {
        remaining.push_str(&text[last..d.offset]);
        last = d.end;
    }
    remaining.push_str(&text[last..]);

    Ok(DocBlock {
        directives,
        prose: clean_prose(&remaining),
    })
}

/// Trim lines, drop leading and trailing blanks, collapse blank runs
fn clean_prose(text: &str) -> Option<String> {
    let mut lines: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() && lines.last().is_none_or(|l| l.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}
