//! GraphQL SDL rendering of resolved blocks

use crate::ir::{ArtifactKind, Deprecation, SchemaBlock};

/// First line of every generated file
pub const HEADER: &str = "# Code generated by gqlforge. DO NOT EDIT.";

const INDENT: &str = "  ";

/// Render one block; `gqlgen` adds `@goModel` / `@goField` directives
pub fn render_block(block: &SchemaBlock, gqlgen: bool) -> String {
    let mut output = String::new();

    if let Some(description) = &block.description {
        push_description(&mut output, description, "");
    }

    output.push_str(&format!("{} {}", block.kind.keyword(), block.name));
    if gqlgen && let Some(model) = &block.go_model {
        output.push_str(&format!(" @goModel(model: {})", string_literal(model)));
    }

    if block.is_empty() {
        output.push('\n');
        return output;
    }
    output.push_str(" {\n");

    match block.kind {
        ArtifactKind::Enum => {
            for value in &block.values {
                if let Some(description) = &value.description {
                    push_description(&mut output, description, INDENT);
                }
                output.push_str(&format!("{INDENT}{}", value.display_name));
                if let Some(deprecation) = &value.deprecated {
                    output.push_str(&deprecated(deprecation));
                }
                output.push('\n');
            }
        }
        ArtifactKind::Type | ArtifactKind::Input => {
            for field in &block.fields {
                if let Some(description) = &field.description {
                    push_description(&mut output, description, INDENT);
                }
                output.push_str(&format!("{INDENT}{}: {}", field.name, field.type_text));
                if gqlgen && field.force_resolver {
                    output.push_str(" @goField(forceResolver: true)");
                }
                if let Some(deprecation) = &field.deprecated {
                    output.push_str(&deprecated(deprecation));
                }
                output.push('\n');
            }
        }
    }

    output.push_str("}\n");
    output
}

fn push_description(output: &mut String, text: &str, indent: &str) {
    output.push_str(&format!("{indent}\"\"\"\n"));
    for line in text.replace("\"\"\"", "\\\"\"\"").lines() {
        if line.is_empty() {
            output.push('\n');
        } else {
            output.push_str(&format!("{indent}{line}\n"));
        }
    }
    output.push_str(&format!("{indent}\"\"\"\n"));
}

fn deprecated(deprecation: &Deprecation) -> String {
    match &deprecation.reason {
        Some(reason) => format!(" @deprecated(reason: {})", string_literal(reason)),
        None => " @deprecated".to_string(),
    }
}

/// Double-quoted SDL string
fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
