//! Import path derivation from `go.mod`

use gqlforge_core::{GenError, GenResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Module root located by walking up from a package directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub root: PathBuf,
    pub path: String,
}

/// Caches `go.mod` lookups per directory
#[derive(Debug, Default)]
pub struct ModuleResolver {
    by_dir: HashMap<PathBuf, Option<Module>>,
}

impl ModuleResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Import path of the package containing `file`, if a `go.mod` governs it
    pub fn import_path(&mut self, file: &Path) -> GenResult<Option<String>> {
        let dir = match file.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let dir = std::fs::canonicalize(dir).map_err(|e| GenError::io(dir, e))?;

        let Some(module) = self.module_for(&dir)? else {
            return Ok(None);
        };

        let rel = dir.strip_prefix(&module.root).unwrap_or(Path::new(""));
        let rel: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();

        Ok(Some(if rel.is_empty() {
            module.path
        } else {
            format!("{}/{}", module.path, rel.join("/"))
        }))
    }

    fn module_for(&mut self, dir: &Path) -> GenResult<Option<Module>> {
        if let Some(cached) = self.by_dir.get(dir) {
            return Ok(cached.clone());
        }

        let go_mod = dir.join("go.mod");
        let found = if go_mod.is_file() {
            let content =
                std::fs::read_to_string(&go_mod).map_err(|e| GenError::io(&go_mod, e))?;
            module_directive(&content).map(|path| Module {
                root: dir.to_path_buf(),
                path,
            })
        } else {
            match dir.parent() {
                Some(parent) => self.module_for(parent)?,
                None => None,
            }
        };

        self.by_dir.insert(dir.to_path_buf(), found.clone());
        Ok(found)
    }
}

/// Extract the module path from `go.mod` content
pub fn module_directive(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let line = line.split("//").next().unwrap_or_default().trim();
        let rest = line.strip_prefix("module")?;
        if !rest.starts_with([' ', '\t']) {
            return None;
        }
        let path = rest.trim().trim_matches('"');
        (!path.is_empty()).then(|| path.to_string())
    })
}
