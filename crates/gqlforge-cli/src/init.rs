//! Init command implementation
//!
//! Writes a starter `gqlforge.toml` with every option at its default.

use crate::config_file::DEFAULT_CONFIG_FILE;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const STARTER_CONFIG: &str = r##"# gqlforge configuration

# Files, directories, `dir/*` (one level) or `dir/...` (recursive)
roots = ["./models/..."]
output = "graph/schema"

# single | multiple | package
strategy = "single"
schema_file_name = "schema.graphqls"
extension = "graphqls"

# camel | snake | pascal | original
field_case = "camel"
use_json_tag = true
use_gqlgen_directives = false
doc_descriptions = true
map_id_fields = true
include_empty_types = false
skip_existing = false
namespace_separator = "/"

[naming]
strip_prefixes = []
strip_suffixes = []
type_prefix = ""
type_suffix = ""
input_prefix = ""
input_suffix = ""
input_token = "Input"

[scalars]
"time.Time" = "Time"

[auto_discovery]
# none | referenced | all | patterns
strategy = "none"
max_depth = 3
patterns = []

[keep]
begin_marker = "# @gqlKeepBegin"
end_marker = "# @gqlKeepEnd"
# top | bottom
position = "bottom"
"##;

/// Write the starter configuration into `dir`, returning its path
pub fn write_starter(dir: &Path, force: bool) -> Result<PathBuf> {
    let path = dir.join(DEFAULT_CONFIG_FILE);
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    fs::write(&path, STARTER_CONFIG)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

pub fn run(path: Option<PathBuf>, force: bool) -> Result<()> {
    let dir = path.unwrap_or_else(|| PathBuf::from("."));
    let written = write_starter(&dir, force)?;

    println!("✓ Created {}", written.display());
    println!("\nAnnotate Go types with `// @gqlType`, then run `gqlforge generate`.");
    Ok(())
}
