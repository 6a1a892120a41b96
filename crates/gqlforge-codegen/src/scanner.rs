//! Source scanning: root expansion, parallel parsing, import paths

use crate::gomod::ModuleResolver;
use crate::roots::expand_roots;
use crate::source::{GoFile, parse_file};
use gqlforge_core::GenResult;
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::debug;

/// Expand `roots` and parse every file they name
pub fn scan_roots(roots: &[String]) -> GenResult<Vec<GoFile>> {
    let paths = expand_roots(roots)?;
    scan_files(&paths)
}

/// Parse files in parallel; results keep the order of `paths` and the first
/// failing file in that order is reported.
pub fn scan_files(paths: &[PathBuf]) -> GenResult<Vec<GoFile>> {
    let parsed: Vec<GenResult<GoFile>> = paths.par_iter().map(|p| parse_file(p)).collect();

    let mut modules = ModuleResolver::new();
    let mut files = Vec::with_capacity(parsed.len());
    for result in parsed {
        let mut file = result?;
        file.import_path = modules.import_path(&file.path)?;
        debug!(
            path = %file.path.display(),
            package = %file.package,
            types = file.types.len(),
            consts = file.consts.len(),
            "scanned file"
        );
        files.push(file);
    }

    Ok(files)
}

#[cfg(test)]
#[path = "scanner/scanner_tests.rs"]
mod scanner_tests;
