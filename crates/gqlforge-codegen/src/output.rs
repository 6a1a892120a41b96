//! Output planning and writing.
//!
//! Blocks are grouped into files by the configured strategy, each file is
//! assembled with its header and preserved region, and only files whose
//! content changed are written.

use crate::ir::SchemaBlock;
use crate::naming::to_snake_case;
use crate::preserve::{capture, render_region};
use crate::render::{HEADER, render_block};
use gqlforge_core::{GenError, GenResult, GeneratorConfig, KeepPosition, OutputStrategy};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What happens to a planned file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Created,
    Updated,
    Unchanged,
    /// Exists and `skip_existing` is set
    Skipped,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FileStatus::Created => "created",
            FileStatus::Updated => "updated",
            FileStatus::Unchanged => "unchanged",
            FileStatus::Skipped => "skipped",
        };
        f.write_str(text)
    }
}

/// A fully assembled output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub path: PathBuf,
    /// Names of the blocks in file order
    pub blocks: Vec<String>,
    pub content: String,
    pub status: FileStatus,
}

impl PlannedFile {
    pub fn needs_write(&self) -> bool {
        matches!(self.status, FileStatus::Created | FileStatus::Updated)
    }
}

/// Directory segments of a namespace
fn namespace_segments<'a>(namespace: &'a str, separator: &str) -> Vec<&'a str> {
    namespace
        .split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Sort blocks and assign each to its target file
pub fn group_blocks(
    mut blocks: Vec<SchemaBlock>,
    config: &GeneratorConfig,
) -> GenResult<BTreeMap<PathBuf, Vec<SchemaBlock>>> {
    blocks.sort_by(|a, b| {
        a.effective_namespace()
            .cmp(b.effective_namespace())
            .then(a.order.cmp(&b.order))
    });

    let mut files: BTreeMap<PathBuf, Vec<SchemaBlock>> = BTreeMap::new();
    let separator = config.namespace_separator.as_str();

    match config.strategy {
        OutputStrategy::Single => {
            files.insert(config.output.join(&config.schema_file_name), blocks);
        }
        OutputStrategy::Multiple => {
            for block in blocks {
                let mut path = config.output.clone();
                if let Some(namespace) = &block.namespace {
                    path.extend(namespace_segments(namespace, separator));
                }
                path.push(format!("{}.{}", to_snake_case(&block.name), config.extension));

                if let Some(existing) = files.get(&path).and_then(|b| b.first()) {
                    return Err(GenError::ArtifactCollision {
                        name: path.display().to_string(),
                        first: existing.source.clone(),
                        second: block.source,
                    });
                }
                files.insert(path, vec![block]);
            }
        }
        OutputStrategy::Package => {
            for block in blocks {
                let segments = namespace_segments(block.effective_namespace(), separator);
                let mut path = config.output.clone();
                match segments.split_last() {
                    Some((last, dirs)) => {
                        path.extend(dirs);
                        path.push(format!("{last}.{}", config.extension));
                    }
                    None => path.push(format!("{}.{}", block.package, config.extension)),
                }
                files.entry(path).or_default().push(block);
            }
        }
    }

    Ok(files)
}

/// Header, preserved region and blocks separated by blank lines
pub fn assemble(blocks: &[SchemaBlock], preserved: Option<&str>, config: &GeneratorConfig) -> String {
    let region = render_region(preserved, &config.keep);
    let gqlgen = config.use_gqlgen_directives;

    let mut parts = vec![format!("{HEADER}\n")];
    if config.keep.position == KeepPosition::Top {
        parts.push(region.clone());
    }
    parts.extend(blocks.iter().map(|b| render_block(b, gqlgen)));
    if config.keep.position == KeepPosition::Bottom {
        parts.push(region);
    }
    parts.join("\n")
}

fn read_existing(path: &Path) -> GenResult<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(GenError::io(path, e)),
    }
}

/// Assemble every file against what is already on disk
pub fn plan(blocks: Vec<SchemaBlock>, config: &GeneratorConfig) -> GenResult<Vec<PlannedFile>> {
    let mut planned = Vec::new();

    for (path, blocks) in group_blocks(blocks, config)? {
        let names = blocks.iter().map(|b| b.name.clone()).collect();
        let existing = read_existing(&path)?;

        if config.skip_existing
            && let Some(existing) = &existing
        {
            planned.push(PlannedFile {
                path,
                blocks: names,
                content: existing.clone(),
                status: FileStatus::Skipped,
            });
            continue;
        }

        let preserved = match &existing {
            Some(text) => capture(&path, text, &config.keep)?,
            None => None,
        };
        let content = assemble(&blocks, preserved.as_deref(), config);
        let status = match existing {
            None => FileStatus::Created,
            Some(text) if text == content => FileStatus::Unchanged,
            Some(_) => FileStatus::Updated,
        };

        planned.push(PlannedFile {
            path,
            blocks: names,
            content,
            status,
        });
    }

    Ok(planned)
}

/// Write created and updated files
pub fn write(planned: &[PlannedFile]) -> GenResult<()> {
    for file in planned {
        if !file.needs_write() {
            debug!(path = %file.path.display(), status = %file.status, "not writing");
            continue;
        }
        if let Some(parent) = file.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| GenError::io(parent, e))?;
        }
        std::fs::write(&file.path, &file.content).map_err(|e| GenError::io(&file.path, e))?;
        debug!(path = %file.path.display(), status = %file.status, "wrote schema file");
    }
    Ok(())
}
