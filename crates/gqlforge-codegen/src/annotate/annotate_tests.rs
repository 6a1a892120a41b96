#![allow(non_snake_case)]

use super::*;
use crate::ir::{Deprecation, Nullability};
use crate::source::parse_source;
use gqlforge_core::ErrorKind;
use std::path::PathBuf;

fn go(path: &str, import_path: Option<&str>, src: &str) -> GoFile {
    let mut file = parse_source(&PathBuf::from(path), src).unwrap();
    file.import_path = import_path.map(str::to_string);
    file
}

fn run(files: &[GoFile]) -> GenResult<Annotated> {
    annotate(files, &GeneratorConfig::new())
}

fn fields(record: &TypeRecord) -> &[FieldRecord] {
    match &record.shape {
        TypeShape::Struct(fields) => fields,
        other => panic!("expected struct, got {other:?}"),
    }
}

// ============================================================================
// Type directives
// ============================================================================

#[test]
fn annotate___type_and_input_artifacts_in_directive_order() {
    let file = go(
        "user.go",
        None,
        r#"package models

// User is a customer.
// @gqlType(name: "Customer", description: "A customer")
// @gqlInput(ignoreAll)
type User struct {
    ID string
}
"#,
    );

    let out = run(&[file]).unwrap();
    let user = &out.types[0];

    assert_eq!(user.artifacts.len(), 2);
    assert_eq!(user.artifacts[0].kind, ArtifactKind::Type);
    assert_eq!(user.artifacts[0].custom_name.as_deref(), Some("Customer"));
    assert_eq!(user.artifacts[0].description.as_deref(), Some("A customer"));
    assert_eq!(user.artifacts[1].kind, ArtifactKind::Input);
    assert!(user.artifacts[1].ignore_all);
    assert_eq!(user.doc.as_deref(), Some("User is a customer."));
}

#[test]
fn annotate___doc_prose_dropped_when_descriptions_disabled() {
    let file = go(
        "user.go",
        None,
        "package models\n\n// User docs.\n// @gqlType\ntype User struct{}\n",
    );
    let mut config = GeneratorConfig::new();
    config.doc_descriptions = false;

    let out = annotate(&[file], &config).unwrap();

    assert_eq!(out.types[0].doc, None);
}

#[test]
fn annotate___extra_field_keeps_raw_type() {
    let file = go(
        "user.go",
        None,
        r#"package models

// @gqlType
// @gqlExtraField(name: "friends", type: [User!]!, on: [User], deprecated: "use links")
type User struct{}
"#,
    );

    let out = run(&[file]).unwrap();
    let extra = &out.types[0].extra_fields[0];

    assert_eq!(extra.name, "friends");
    assert_eq!(extra.type_text, "[User!]!");
    assert_eq!(extra.on, Scope::Only(vec!["User".to_string()]));
    assert_eq!(
        extra.deprecated,
        Some(Deprecation {
            reason: Some("use links".to_string())
        })
    );
}

#[test]
fn annotate___enum_on_struct_is_rejected() {
    let file = go("a.go", None, "package a\n\n// @gqlEnum\ntype A struct{}\n");

    let err = run(&[file]).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Directive);
    assert!(err.to_string().contains("@gqlEnum"));
}

#[test]
fn annotate___enum_value_on_type_is_rejected() {
    let file = go("a.go", None, "package a\n\n// @gqlEnumValue\ntype A string\n");

    assert_eq!(run(&[file]).unwrap_err().kind(), ErrorKind::Directive);
}

#[test]
fn annotate___enum_spec_on_named_type() {
    let file = go(
        "status.go",
        None,
        "package a\n\n// @gqlEnum(name: \"OrderStatus\")\ntype Status string\n",
    );

    let out = run(&[file]).unwrap();

    assert_eq!(
        out.types[0].enum_spec.as_ref().and_then(|e| e.custom_name.as_deref()),
        Some("OrderStatus")
    );
}

// ============================================================================
// Namespaces
// ============================================================================

#[test]
fn annotate___package_namespace_applies_to_every_file_of_the_package() {
    let a = go(
        "a.go",
        Some("example.com/app/billing"),
        "// @gqlNamespace(name: \"billing\")\npackage billing\n\ntype Invoice struct{}\n",
    );
    let b = go(
        "b.go",
        Some("example.com/app/billing"),
        "package billing\n\n// @gqlNamespace(\"special\")\ntype Refund struct{}\n\ntype Payment struct{}\n",
    );

    let out = run(&[b, a]).unwrap();
    let ns = |name: &str| {
        out.types
            .iter()
            .find(|t| t.name == name)
            .and_then(|t| t.namespace.clone())
    };

    assert_eq!(ns("Invoice").as_deref(), Some("billing"));
    assert_eq!(ns("Payment").as_deref(), Some("billing"));
    assert_eq!(ns("Refund").as_deref(), Some("special"));
}

#[test]
fn annotate___type_directive_on_package_is_rejected() {
    let file = go("a.go", None, "// @gqlType\npackage a\n");

    let err = run(&[file]).unwrap_err();

    assert!(err.to_string().contains("package a"));
}

// ============================================================================
// Fields
// ============================================================================

#[test]
fn annotate___field_tags_are_interpreted() {
    let file = go(
        "user.go",
        None,
        r#"package models

type User struct {
    // Primary key.
    ID    string `json:"id" gql:"userId,ro,optional"`
    Email string `json:"-"`
}
"#,
    );

    let out = run(&[file]).unwrap();
    let fields = fields(&out.types[0]);

    assert_eq!(fields[0].options.name.as_deref(), Some("userId"));
    assert!(fields[0].options.read_only);
    assert_eq!(fields[0].options.nullability, Some(Nullability::Optional));
    assert_eq!(fields[0].json.name.as_deref(), Some("id"));
    assert_eq!(fields[0].doc.as_deref(), Some("Primary key."));
    assert_eq!(fields[0].origin, "User.ID");
    assert!(fields[1].json.skip);
}

#[test]
fn annotate___malformed_gql_tag_names_the_field() {
    let file = go(
        "user.go",
        None,
        "package models\n\ntype User struct {\n    ID string `gql:\"ro,wo\"`\n}\n",
    );

    let err = run(&[file]).unwrap_err();

    match err {
        GenError::Directive {
            owner, directive, ..
        } => {
            assert_eq!(owner, "User.ID");
            assert_eq!(directive, "gql tag");
        }
        other => panic!("expected directive error, got {other:?}"),
    }
}

#[test]
fn annotate___directive_in_field_doc_is_rejected() {
    let file = go(
        "user.go",
        None,
        "package models\n\ntype User struct {\n    // @gqlType\n    ID string\n}\n",
    );

    assert_eq!(run(&[file]).unwrap_err().kind(), ErrorKind::Directive);
}

#[test]
fn annotate___embedded_field_with_json_name_becomes_named() {
    let file = go(
        "user.go",
        None,
        r#"package models

type User struct {
    Base
    *Audit `json:"audit"`
}
"#,
    );

    let out = run(&[file]).unwrap();
    let fields = fields(&out.types[0]);

    assert!(fields[0].is_embedded());
    assert_eq!(fields[1].go_name.as_deref(), Some("Audit"));
    assert!(fields[1].ty.is_pointer());
}

// ============================================================================
// Canonical identities
// ============================================================================

#[test]
fn annotate___canonical_package_identities() {
    let file = go(
        "user.go",
        Some("example.com/app/models"),
        r#"package models

import (
    "time"
    ext "example.com/app/external"
)

type Box[T any] struct {
    Value T
}

type User struct {
    Created time.Time
    Ref     ext.Thing
    Local   Address
    Name    string
    Boxed   Box[Address]
}
"#,
    );

    let out = run(&[file]).unwrap();
    let user = out.types.iter().find(|t| t.name == "User").unwrap();
    let package_of = |i: usize| match &fields(user)[i].ty {
        TypeExpr::Named { package, .. } => package.clone(),
        other => panic!("expected named, got {other:?}"),
    };

    assert_eq!(package_of(0).as_deref(), Some("time"));
    assert_eq!(package_of(1).as_deref(), Some("example.com/app/external"));
    assert_eq!(package_of(2).as_deref(), Some("example.com/app/models"));
    assert_eq!(package_of(3), None);

    let boxed = out.types.iter().find(|t| t.name == "Box").unwrap();
    assert!(matches!(&fields(boxed)[0].ty, TypeExpr::Named { package: None, .. }));
    match &fields(user)[4].ty {
        TypeExpr::Named { args, .. } => assert!(matches!(
            &args[0],
            TypeExpr::Named { package: Some(p), .. } if p == "example.com/app/models"
        )),
        other => panic!("expected named, got {other:?}"),
    }
}

// ============================================================================
// Constants
// ============================================================================

#[test]
fn annotate___const_enum_value_spec() {
    let file = go(
        "status.go",
        None,
        r#"package a

// @gqlEnum
type Status int

const (
    // @gqlEnumValue(name: "ACTIVE_NOW", deprecated)
    StatusActive Status = iota
    StatusGone
)
"#,
    );

    let out = run(&[file]).unwrap();

    let first = &out.consts[0];
    let spec = first.value_spec.as_ref().unwrap();
    assert_eq!(spec.name.as_deref(), Some("ACTIVE_NOW"));
    assert_eq!(spec.deprecated, Some(Deprecation::default()));
    assert!(matches!(
        &first.ty,
        Some(TypeExpr::Named { package: Some(p), name, .. }) if p == "a" && name == "Status"
    ));
    assert_eq!(out.consts[1].ty, first.ty);
    assert_eq!(out.consts[1].value_spec, None);
}

#[test]
fn annotate___type_directive_on_const_is_rejected() {
    let file = go("a.go", None, "package a\n\n// @gqlType\nconst X = 1\n");

    assert_eq!(run(&[file]).unwrap_err().kind(), ErrorKind::Directive);
}
