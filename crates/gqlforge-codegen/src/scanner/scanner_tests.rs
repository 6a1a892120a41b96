#![allow(non_snake_case)]

use super::*;
use gqlforge_core::GenError;
use std::fs;
use tempfile::TempDir;

fn write(dir: &TempDir, rel: &str, content: &str) -> PathBuf {
    let path = dir.path().join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn scan_files___keeps_visit_order() {
    let dir = TempDir::new().unwrap();
    let b = write(&dir, "b/b.go", "package b\n\ntype B struct{}\n");
    let a = write(&dir, "a/a.go", "package a\n\ntype A struct{}\n");

    let files = scan_files(&[b, a]).unwrap();

    let packages: Vec<_> = files.iter().map(|f| f.package.as_str()).collect();
    assert_eq!(packages, vec!["b", "a"]);
}

#[test]
fn scan_files___fills_import_path_from_go_mod() {
    let dir = TempDir::new().unwrap();
    write(&dir, "go.mod", "module example.com/app\n");
    let file = write(&dir, "models/user.go", "package models\n\ntype User struct{}\n");

    let files = scan_files(&[file]).unwrap();

    assert_eq!(files[0].import_path.as_deref(), Some("example.com/app/models"));
}

#[test]
fn scan_files___reports_first_broken_file_in_order() {
    let dir = TempDir::new().unwrap();
    let good = write(&dir, "good.go", "package x\n\ntype Ok struct{}\n");
    let first_bad = write(&dir, "bad1.go", "package x\n\ntype Broken struct {\n");
    let second_bad = write(&dir, "bad2.go", "package x\n\nfunc (\n");

    let err = scan_files(&[good, first_bad.clone(), second_bad]).unwrap_err();

    match err {
        GenError::Scan { path, .. } => assert_eq!(path, first_bad),
        other => panic!("expected scan error, got {other:?}"),
    }
}

#[test]
fn scan_roots___expands_then_parses() {
    let dir = TempDir::new().unwrap();
    write(&dir, "models/user.go", "package models\n\ntype User struct{}\n");
    write(&dir, "models/user_test.go", "package models\n\nthis is not go\n");

    let files = scan_roots(&[format!("{}/models/...", dir.path().display())]).unwrap();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].types[0].name, "User");
}
