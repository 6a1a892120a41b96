//! Root specifier expansion.
//!
//! | Specifier | Files |
//! |-----------|-------|
//! | `models/user.go` | that file |
//! | `models` | `.go` files directly inside |
//! | `models/*`, `models/*.go` | one level, directories contribute their files |
//! | `models/**`, `models/...` | everything below |
//! | `internal/**/dto` | every `dto` directory at any depth |
//! | `internal/**/*_dto.go` | path suffixes matching the pattern at any depth |
//!
//! Test files, `vendor`, `testdata` and dot directories are skipped. A base
//! path that does not exist yields no files.

use glob::{MatchOptions, Pattern};
use gqlforge_core::{GenError, GenResult};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

const SKIPPED_DIRS: &[&str] = &["vendor", "testdata"];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Expand every root, visiting each file once (first visit wins)
pub fn expand_roots(roots: &[String]) -> GenResult<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for root in roots {
        for file in expand_root(root)? {
            let key = std::fs::canonicalize(&file).unwrap_or_else(|_| file.clone());
            if seen.insert(key) {
                files.push(file);
            }
        }
    }

    Ok(files)
}

/// Expand one root specifier into sorted `.go` files
pub fn expand_root(spec: &str) -> GenResult<Vec<PathBuf>> {
    let normalized = spec.trim().replace("...", "**");
    let (base, remainder) = split_pattern(&normalized);

    if !base.exists() {
        debug!(root = %spec, "root does not exist, nothing to scan");
        return Ok(Vec::new());
    }

    let Some(remainder) = remainder else {
        if base.is_file() {
            return Ok(if is_go_source(&base) { vec![base] } else { Vec::new() });
        }
        return go_files_in(&base);
    };

    if remainder.contains("**") {
        expand_recursive(&base, &remainder, spec)
    } else {
        expand_single_level(&base, &remainder, spec)
    }
}

/// Split at the first component holding a wildcard
fn split_pattern(spec: &str) -> (PathBuf, Option<String>) {
    let components: Vec<&str> = spec.split('/').collect();
    let Some(first_wild) = components.iter().position(|c| has_wildcard(c)) else {
        return (PathBuf::from(spec), None);
    };

    let base = components[..first_wild].join("/");
    let base = if base.is_empty() {
        if spec.starts_with('/') { "/".to_string() } else { ".".to_string() }
    } else {
        base
    };
    (PathBuf::from(base), Some(components[first_wild..].join("/")))
}

fn has_wildcard(s: &str) -> bool {
    s.contains(['*', '?', '['])
}

fn is_go_source(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".go") && !name.ends_with("_test.go")
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref())
}

fn walk_error(base: &Path, err: walkdir::Error) -> GenError {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| base.to_path_buf());
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
    GenError::Io { path, source }
}

/// Sorted, filtered walk below `base`
fn walk(base: &Path, max_depth: Option<usize>) -> GenResult<Vec<DirEntry>> {
    let mut walker = WalkDir::new(base).sort_by_file_name();
    if let Some(depth) = max_depth {
        walker = walker.max_depth(depth);
    }

    let mut entries = Vec::new();
    for entry in walker.into_iter().filter_entry(|e| !is_skipped_dir(e)) {
        entries.push(entry.map_err(|e| walk_error(base, e))?);
    }
    Ok(entries)
}

/// `.go` files directly inside a directory
fn go_files_in(dir: &Path) -> GenResult<Vec<PathBuf>> {
    Ok(walk(dir, Some(1))?
        .into_iter()
        .filter(|e| e.file_type().is_file() && is_go_source(e.path()))
        .map(DirEntry::into_path)
        .collect())
}

/// Path of `path` relative to `base`, `/`-separated
fn relative(base: &Path, path: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn compile(pattern: &str, spec: &str) -> GenResult<Pattern> {
    Pattern::new(pattern)
        .map_err(|e| GenError::Config(format!("invalid root pattern `{spec}`: {e}")))
}

fn expand_recursive(base: &Path, remainder: &str, spec: &str) -> GenResult<Vec<PathBuf>> {
    let mut tail = remainder;
    while let Some(rest) = tail.strip_prefix("**/") {
        tail = rest;
    }
    if tail == "**" {
        tail = "";
    }

    let files = walk(base, None)?
        .into_iter()
        .filter(|e| e.file_type().is_file() && is_go_source(e.path()));

    if tail.is_empty() {
        return Ok(files.map(DirEntry::into_path).collect());
    }

    if !has_wildcard(tail) && Path::new(tail).extension().is_none() {
        // directory name at any depth
        let needle = format!("/{tail}/");
        return Ok(files
            .filter(|e| {
                let rel_dir = e
                    .path()
                    .parent()
                    .map(|p| relative(base, p))
                    .unwrap_or_default();
                format!("/{rel_dir}/").contains(&needle)
            })
            .map(DirEntry::into_path)
            .collect());
    }

    let pattern = compile(tail, spec)?;
    Ok(files
        .filter(|e| {
            let rel = relative(base, e.path());
            let parts: Vec<&str> = rel.split('/').collect();
            (0..parts.len()).any(|i| pattern.matches_with(&parts[i..].join("/"), MATCH_OPTIONS))
        })
        .map(DirEntry::into_path)
        .collect())
}

fn expand_single_level(base: &Path, remainder: &str, spec: &str) -> GenResult<Vec<PathBuf>> {
    let pattern = compile(remainder, spec)?;
    let depth = remainder.split('/').count();

    let mut files = Vec::new();
    for entry in walk(base, Some(depth))? {
        if entry.depth() == 0 || !pattern.matches_with(&relative(base, entry.path()), MATCH_OPTIONS) {
            continue;
        }
        if entry.file_type().is_dir() {
            files.extend(go_files_in(entry.path())?);
        } else if is_go_source(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
