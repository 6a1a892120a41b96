//! Go source extraction.
//!
//! Each file is parsed with tree-sitter-go and reduced to the declarations
//! the generator cares about: the package clause, imports, type
//! declarations (with fields, tags and doc comments) and constants. Type
//! expressions are produced with the package qualifier as written; package
//! identities are filled in later by [`crate::annotate`].

use crate::ir::TypeExpr;
use gqlforge_core::{GenError, GenResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser};

/// Declarations extracted from one `.go` file
#[derive(Debug, Clone, PartialEq)]
pub struct GoFile {
    pub path: PathBuf,
    pub package: String,
    /// Doc comment on the `package` clause
    pub package_doc: Option<String>,
    /// Import alias to import path
    pub imports: BTreeMap<String, String>,
    pub types: Vec<GoTypeDecl>,
    pub consts: Vec<GoConst>,
    /// Import path of this file's package, from `go.mod`
    pub import_path: Option<String>,
}

/// One `type` spec
#[derive(Debug, Clone, PartialEq)]
pub struct GoTypeDecl {
    pub name: String,
    pub doc: Option<String>,
    pub line: usize,
    pub type_params: Vec<String>,
    pub body: GoTypeBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GoTypeBody {
    Struct(Vec<GoField>),
    Named(TypeExpr),
    Alias(TypeExpr),
}

/// One struct field; multi-name declarations are split
#[derive(Debug, Clone, PartialEq)]
pub struct GoField {
    /// `None` for an embedded field
    pub name: Option<String>,
    pub ty: TypeExpr,
    /// Tag content without the surrounding quotes
    pub tag: Option<String>,
    pub doc: Option<String>,
    pub line: usize,
}

/// One constant name
#[derive(Debug, Clone, PartialEq)]
pub struct GoConst {
    pub name: String,
    /// Declared type, or the type repeated from the previous spec of a group
    pub ty: Option<TypeExpr>,
    pub doc: Option<String>,
    pub line: usize,
}

/// Read and parse a Go file
pub fn parse_file(path: &Path) -> GenResult<GoFile> {
    let source = std::fs::read_to_string(path).map_err(|e| GenError::io(path, e))?;
    parse_source(path, &source)
}

/// Parse Go source text
pub fn parse_source(path: &Path, source: &str) -> GenResult<GoFile> {
    let scan_error = |line: usize, column: usize, message: String| GenError::Scan {
        path: path.to_path_buf(),
        line,
        column,
        message,
    };

    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_go::LANGUAGE.into())
        .map_err(|e| scan_error(1, 1, format!("cannot load Go grammar: {e}")))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| scan_error(1, 1, "parser produced no tree".to_string()))?;

    let root = tree.root_node();
    if root.has_error()
        && let Some(bad) = first_error(root)
    {
        let pos = bad.start_position();
        let message = if bad.is_missing() {
            format!("missing `{}`", bad.kind())
        } else {
            let snippet: String = text(bad, source).chars().take(24).collect();
            format!("unexpected `{}`", snippet.trim())
        };
        return Err(scan_error(pos.row + 1, pos.column + 1, message));
    }

    let mut file = GoFile {
        path: path.to_path_buf(),
        package: String::new(),
        package_doc: None,
        imports: BTreeMap::new(),
        types: Vec::new(),
        consts: Vec::new(),
        import_path: None,
    };

    let mut cursor = root.walk();
    for node in root.named_children(&mut cursor) {
        match node.kind() {
            "package_clause" => {
                file.package = node
                    .named_child(0)
                    .map(|n| text(n, source).to_string())
                    .unwrap_or_default();
                file.package_doc = leading_doc(node, source);
            }
            "import_declaration" => collect_imports(node, source, &mut file.imports),
            "type_declaration" => collect_types(node, source, &mut file.types),
            "const_declaration" => collect_consts(node, source, &mut file.consts),
            _ => {}
        }
    }

    if file.package.is_empty() {
        return Err(scan_error(1, 1, "missing package clause".to_string()));
    }

    Ok(file)
}

fn text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or_default()
}

fn line(node: Node<'_>) -> usize {
    node.start_position().row + 1
}

/// First ERROR or MISSING node in source order
fn first_error(root: Node<'_>) -> Option<Node<'_>> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if !node.has_error() {
            continue;
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    None
}

/// Strip comment markers from one `//` or `/* */` comment
fn comment_text(raw: &str) -> String {
    if let Some(line) = raw.strip_prefix("//") {
        return line.strip_prefix(' ').unwrap_or(line).trim_end().to_string();
    }
    let inner = raw
        .strip_prefix("/*")
        .and_then(|r| r.strip_suffix("*/"))
        .unwrap_or(raw);
    inner
        .lines()
        .map(|l| {
            let l = l.trim();
            l.strip_prefix('*').map(str::trim_start).unwrap_or(l)
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Comments directly above `node` with no blank line in between
fn leading_doc(node: Node<'_>, source: &str) -> Option<String> {
    let mut parts = Vec::new();
    let mut expected_row = node.start_position().row;
    let mut current = node.prev_named_sibling();

    while let Some(prev) = current {
        if prev.kind() != "comment" || prev.end_position().row + 1 != expected_row {
            break;
        }
        // a trailing comment of the previous line belongs to that line
        if prev.prev_named_sibling().is_some_and(|p| {
            p.kind() != "comment" && p.end_position().row == prev.start_position().row
        }) {
            break;
        }
        parts.push(comment_text(text(prev, source)));
        expected_row = prev.start_position().row;
        current = prev.prev_named_sibling();
    }

    if parts.is_empty() {
        return None;
    }
    parts.reverse();
    Some(parts.join("\n"))
}

/// Comment on the same line right after `node`
fn trailing_comment(node: Node<'_>, source: &str) -> Option<String> {
    let row = node.start_position().row;
    let same_line = |c: &Node<'_>| c.kind() == "comment" && c.start_position().row == row;
    let after = node
        .next_named_sibling()
        .filter(|c| c.kind() == "comment" && c.start_position().row == node.end_position().row);
    let inside = || {
        let mut cursor = node.walk();
        node.named_children(&mut cursor).last().filter(same_line)
    };
    after.or_else(inside).map(|c| comment_text(text(c, source)))
}

fn join_docs(leading: Option<String>, trailing: Option<String>) -> Option<String> {
    match (leading, trailing) {
        (Some(a), Some(b)) => Some(format!("{a}\n{b}")),
        (a, b) => a.or(b),
    }
}

fn is_grouped(decl: Node<'_>) -> bool {
    let mut cursor = decl.walk();
    decl.children(&mut cursor).any(|c| c.kind() == "(")
}

/// Default package alias of an import path
fn default_alias(path: &str) -> String {
    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let is_major_version = |s: &str| {
        s.len() > 1 && s.starts_with('v') && s[1..].chars().all(|c| c.is_ascii_digit())
    };
    if segments.len() > 1 && segments.last().is_some_and(|s| is_major_version(s)) {
        segments.pop();
    }
    let last = segments.last().copied().unwrap_or(path);
    let last = match last.rsplit_once('.') {
        Some((head, tail)) if is_major_version(tail) => head,
        _ => last,
    };
    last.strip_prefix("go-").unwrap_or(last).replace('-', "_")
}

fn collect_imports(node: Node<'_>, source: &str, imports: &mut BTreeMap<String, String>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "import_spec_list" => collect_imports(child, source, imports),
            "import_spec" => {
                let Some(path_node) = child.child_by_field_name("path") else {
                    continue;
                };
                let path = text(path_node, source).trim_matches(['"', '`']).to_string();
                let alias = match child.child_by_field_name("name") {
                    Some(name) if name.kind() == "package_identifier" => {
                        text(name, source).to_string()
                    }
                    Some(_) => continue,
                    None => default_alias(&path),
                };
                imports.insert(alias, path);
            }
            _ => {}
        }
    }
}

fn collect_types(decl: Node<'_>, source: &str, out: &mut Vec<GoTypeDecl>) {
    let decl_doc = if is_grouped(decl) {
        None
    } else {
        leading_doc(decl, source)
    };

    let mut cursor = decl.walk();
    for spec in decl.named_children(&mut cursor) {
        let is_alias = match spec.kind() {
            "type_spec" => false,
            "type_alias" => true,
            _ => continue,
        };
        let Some(name) = spec.child_by_field_name("name") else {
            continue;
        };
        let Some(ty) = spec.child_by_field_name("type") else {
            continue;
        };

        let type_params = spec
            .child_by_field_name("type_parameters")
            .map(|list| type_param_names(list, source))
            .unwrap_or_default();

        let body = if is_alias {
            GoTypeBody::Alias(type_expr(ty, source))
        } else if ty.kind() == "struct_type" {
            GoTypeBody::Struct(struct_fields(ty, source))
        } else {
            GoTypeBody::Named(type_expr(ty, source))
        };

        out.push(GoTypeDecl {
            name: text(name, source).to_string(),
            doc: leading_doc(spec, source).or_else(|| decl_doc.clone()),
            line: line(spec),
            type_params,
            body,
        });
    }
}

fn type_param_names(list: Node<'_>, source: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut cursor = list.walk();
    for decl in list.named_children(&mut cursor) {
        if decl.kind() != "type_parameter_declaration" {
            continue;
        }
        let mut name_cursor = decl.walk();
        names.extend(
            decl.children_by_field_name("name", &mut name_cursor)
                .map(|n| text(n, source).to_string()),
        );
    }
    names
}

fn struct_fields(struct_node: Node<'_>, source: &str) -> Vec<GoField> {
    let mut fields = Vec::new();
    let mut cursor = struct_node.walk();
    let Some(list) = struct_node
        .named_children(&mut cursor)
        .find(|n| n.kind() == "field_declaration_list")
    else {
        return fields;
    };

    let mut list_cursor = list.walk();
    for decl in list.named_children(&mut list_cursor) {
        if decl.kind() != "field_declaration" {
            continue;
        }
        let Some(ty_node) = decl.child_by_field_name("type") else {
            continue;
        };
        let tag = decl
            .child_by_field_name("tag")
            .map(|t| tag_content(text(t, source)));
        let doc = join_docs(leading_doc(decl, source), trailing_comment(decl, source));

        let mut name_cursor = decl.walk();
        let names: Vec<String> = decl
            .children_by_field_name("name", &mut name_cursor)
            .map(|n| text(n, source).to_string())
            .collect();

        if names.is_empty() {
            let mut child_cursor = decl.walk();
            let pointer = decl.children(&mut child_cursor).any(|c| c.kind() == "*");
            let base = type_expr(ty_node, source);
            fields.push(GoField {
                name: None,
                ty: if pointer {
                    TypeExpr::Pointer(Box::new(base))
                } else {
                    base
                },
                tag,
                doc,
                line: line(decl),
            });
        } else {
            let ty = type_expr(ty_node, source);
            for name in names {
                fields.push(GoField {
                    name: Some(name),
                    ty: ty.clone(),
                    tag: tag.clone(),
                    doc: doc.clone(),
                    line: line(decl),
                });
            }
        }
    }
    fields
}

/// Unwrap a raw or interpreted string literal
fn tag_content(literal: &str) -> String {
    if let Some(raw) = literal.strip_prefix('`').and_then(|l| l.strip_suffix('`')) {
        return raw.to_string();
    }
    let inner = literal
        .strip_prefix('"')
        .and_then(|l| l.strip_suffix('"'))
        .unwrap_or(literal);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => {}
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn type_expr(node: Node<'_>, source: &str) -> TypeExpr {
    let child = |field: &str| node.child_by_field_name(field).map(|n| type_expr(n, source));
    let boxed = |expr: Option<TypeExpr>| Box::new(expr.unwrap_or_else(|| TypeExpr::Other(String::new())));

    match node.kind() {
        "type_identifier" => match text(node, source) {
            "any" => TypeExpr::Interface,
            name => TypeExpr::named(name),
        },
        "qualified_type" => TypeExpr::Named {
            package: None,
            qualifier: node
                .child_by_field_name("package")
                .map(|p| text(p, source).to_string()),
            name: node
                .child_by_field_name("name")
                .map(|n| text(n, source).to_string())
                .unwrap_or_default(),
            args: Vec::new(),
        },
        "generic_type" => {
            let base = child("type").unwrap_or_else(|| TypeExpr::Other(text(node, source).to_string()));
            let args = node
                .child_by_field_name("type_arguments")
                .map(|list| {
                    let mut cursor = list.walk();
                    list.named_children(&mut cursor)
                        .filter(|n| n.kind() != "comment")
                        .map(|n| type_expr(n, source))
                        .collect()
                })
                .unwrap_or_default();
            match base {
                TypeExpr::Named {
                    package,
                    qualifier,
                    name,
                    ..
                } => TypeExpr::Named {
                    package,
                    qualifier,
                    name,
                    args,
                },
                other => other,
            }
        }
        "type_elem" | "parenthesized_type" => node
            .named_child(0)
            .map(|n| type_expr(n, source))
            .unwrap_or_else(|| TypeExpr::Other(text(node, source).to_string())),
        "pointer_type" => TypeExpr::Pointer(boxed(node.named_child(0).map(|n| type_expr(n, source)))),
        "slice_type" => TypeExpr::Slice(boxed(child("element"))),
        "array_type" | "implicit_length_array_type" => TypeExpr::Array(boxed(child("element"))),
        "map_type" => TypeExpr::Map(boxed(child("key")), boxed(child("value"))),
        "interface_type" => TypeExpr::Interface,
        _ => TypeExpr::Other(text(node, source).to_string()),
    }
}

fn collect_consts(decl: Node<'_>, source: &str, out: &mut Vec<GoConst>) {
    let decl_doc = if is_grouped(decl) {
        None
    } else {
        leading_doc(decl, source)
    };

    let mut repeated: Option<TypeExpr> = None;
    let mut cursor = decl.walk();
    for spec in decl.named_children(&mut cursor) {
        if spec.kind() != "const_spec" {
            continue;
        }

        let declared = spec.child_by_field_name("type").map(|t| type_expr(t, source));
        let has_value = spec.child_by_field_name("value").is_some();
        let ty = match (declared, has_value) {
            (Some(ty), _) => Some(ty),
            (None, true) => None,
            (None, false) => repeated.clone(),
        };
        repeated = ty.clone();

        let doc = join_docs(
            leading_doc(spec, source).or_else(|| decl_doc.clone()),
            trailing_comment(spec, source),
        );

        let mut name_cursor = spec.walk();
        for name in spec.children_by_field_name("name", &mut name_cursor) {
            let name = text(name, source);
            if name == "_" {
                continue;
            }
            out.push(GoConst {
                name: name.to_string(),
                ty: ty.clone(),
                doc: doc.clone(),
                line: line(spec),
            });
        }
    }
}
