//! Hand-edited regions that survive regeneration.
//!
//! Every generated file carries one region delimited by the configured
//! begin and end marker lines. Whatever sits between them in an existing
//! file is copied byte-for-byte into the regenerated file.

use gqlforge_core::{GenError, GenResult, KeepConfig};
use std::path::Path;

/// Capture the region content of an existing file.
///
/// Returns `None` when the file has no markers. Markers match on trimmed
/// lines. An unmatched marker or a second region is an error.
pub fn capture(path: &Path, existing: &str, keep: &KeepConfig) -> GenResult<Option<String>> {
    let begin = keep.begin_marker.trim();
    let end = keep.end_marker.trim();
    let error = |message: &str| GenError::PreservedRegion {
        path: path.to_path_buf(),
        message: message.to_string(),
    };

    let mut captured: Option<String> = None;
    let mut current: Option<String> = None;

    for line in existing.split_inclusive('\n') {
        let trimmed = line.trim();
        if trimmed == begin {
            if current.is_some() {
                return Err(error("nested begin marker"));
            }
            if captured.is_some() {
                return Err(error("more than one preserved region"));
            }
            current = Some(String::new());
        } else if trimmed == end {
            match current.take() {
                Some(content) => captured = Some(content),
                None => return Err(error("end marker without begin marker")),
            }
        } else if let Some(content) = current.as_mut() {
            content.push_str(line);
        }
    }

    if current.is_some() {
        return Err(error("begin marker without end marker"));
    }
    Ok(captured)
}

/// Render the region with its markers
pub fn render_region(content: Option<&str>, keep: &KeepConfig) -> String {
    let mut output = String::new();
    output.push_str(keep.begin_marker.trim());
    output.push('\n');
    if let Some(content) = content.filter(|c| !c.is_empty()) {
        output.push_str(content);
        if !content.ends_with('\n') {
            output.push('\n');
        }
    }
    output.push_str(keep.end_marker.trim());
    output.push('\n');
    output
}
