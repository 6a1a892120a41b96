//! End-to-end generation: scan, annotate, resolve, plan, write

use crate::annotate::annotate;
use crate::discovery::compile_patterns;
use crate::ir::SchemaBlock;
use crate::output::{FileStatus, PlannedFile, plan, write};
use crate::resolver::resolve;
use crate::scanner::scan_roots;
use crate::source::GoFile;
use gqlforge_core::{GenResult, GeneratorConfig};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Outcome for one output file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub status: FileStatus,
    pub blocks: Vec<String>,
}

/// Summary of one generation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub scanned_files: usize,
    pub blocks: usize,
    pub written: usize,
    pub files: Vec<FileReport>,
}

impl GenerationReport {
    fn new(scanned_files: usize, blocks: usize, planned: &[PlannedFile]) -> Self {
        Self {
            scanned_files,
            blocks,
            written: planned.iter().filter(|f| f.needs_write()).count(),
            files: planned
                .iter()
                .map(|f| FileReport {
                    path: f.path.clone(),
                    status: f.status,
                    blocks: f.blocks.clone(),
                })
                .collect(),
        }
    }
}

/// Resolve already-scanned files into schema blocks
pub fn resolve_files(files: &[GoFile], config: &GeneratorConfig) -> GenResult<Vec<SchemaBlock>> {
    resolve(annotate(files, config)?, config)
}

/// Schema generator bound to one configuration
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Validate the configuration and create a generator
    pub fn new(config: GeneratorConfig) -> GenResult<Self> {
        config.validate()?;
        compile_patterns(&config.auto_discovery.patterns)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn planned(&self) -> GenResult<(GenerationReport, Vec<PlannedFile>)> {
        let files = scan_roots(&self.config.roots)?;
        let blocks = resolve_files(&files, &self.config)?;
        let block_count = blocks.len();
        let planned = plan(blocks, &self.config)?;
        Ok((GenerationReport::new(files.len(), block_count, &planned), planned))
    }

    /// Everything except writing
    pub fn plan(&self) -> GenResult<GenerationReport> {
        let (mut report, _) = self.planned()?;
        report.written = 0;
        Ok(report)
    }

    /// Generate and write the schema files
    pub fn run(&self) -> GenResult<GenerationReport> {
        let (report, planned) = self.planned()?;
        write(&planned)?;

        info!(
            scanned = report.scanned_files,
            blocks = report.blocks,
            files = report.files.len(),
            written = report.written,
            "schema generation complete"
        );
        Ok(report)
    }
}
