//! Check command implementation

use crate::config_file::{self, Overrides};
use crate::report::print_report;
use anyhow::{Context, Result};
use gqlforge_codegen::Generator;
use std::path::Path;

/// Scan and resolve, then report what `generate` would write
pub fn run(config_path: Option<&Path>, overrides: Overrides, json: bool) -> Result<()> {
    let config = config_file::load(config_path, Path::new("."), overrides)
        .context("invalid configuration")?;

    let report = Generator::new(config)?
        .plan()
        .context("schema check failed")?;

    print_report(&report, true, json)
}
