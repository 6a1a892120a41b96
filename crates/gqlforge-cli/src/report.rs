//! Report printing and exit codes

use gqlforge_codegen::{FileStatus, GenerationReport};
use gqlforge_core::GenError;

/// Exit code when an error carries no generator error class
const GENERIC_FAILURE: u8 = 1;

/// Process exit code for an error, taken from the first [`GenError`] in its chain
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|e| e.downcast_ref::<GenError>())
        .and_then(|e| u8::try_from(e.exit_code()).ok())
        .unwrap_or(GENERIC_FAILURE)
}

/// Human-readable lines for a report; `planned` describes a dry run
pub fn format_report(report: &GenerationReport, planned: bool) -> String {
    let mut output = String::new();

    for file in &report.files {
        let verb = match (file.status, planned) {
            (FileStatus::Created, false) => "created",
            (FileStatus::Created, true) => "would create",
            (FileStatus::Updated, false) => "updated",
            (FileStatus::Updated, true) => "would update",
            (FileStatus::Unchanged, _) => "unchanged",
            (FileStatus::Skipped, _) => "skipped (exists)",
        };
        output.push_str(&format!(
            "{verb:>16}  {} ({})\n",
            file.path.display(),
            file.blocks.join(", ")
        ));
    }

    let pending = report
        .files
        .iter()
        .filter(|f| matches!(f.status, FileStatus::Created | FileStatus::Updated))
        .count();
    let summary = if planned {
        format!("{pending} file(s) would be written")
    } else {
        format!("{} file(s) written", report.written)
    };
    output.push_str(&format!(
        "\n✓ Scanned {} file(s), {} block(s); {summary}\n",
        report.scanned_files, report.blocks
    ));
    output
}

/// Print a report as JSON or text
pub fn print_report(report: &GenerationReport, planned: bool, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", format_report(report, planned));
    }
    Ok(())
}
