//! Generate command implementation

use crate::config_file::{self, Overrides};
use crate::report::print_report;
use anyhow::{Context, Result};
use gqlforge_codegen::Generator;
use std::path::Path;

pub fn run(config_path: Option<&Path>, overrides: Overrides, json: bool) -> Result<()> {
    let config = config_file::load(config_path, Path::new("."), overrides)
        .context("invalid configuration")?;

    let report = Generator::new(config)?
        .run()
        .context("schema generation failed")?;

    print_report(&report, false, json)
}
