//! Report formatting for the CLI.

use std::io::Write;

use prbot::{RunError, RunReport};

/// Writes one `owner/name: outcome` line per attempted candidate, then a
/// summary line.
pub fn write_report<W: Write>(writer: &mut W, report: &RunReport) -> Result<(), RunError> {
    for (candidate, outcome) in report.outcomes() {
        writeln!(writer, "{}: {outcome}", candidate.slug)?;
    }
    writeln!(
        writer,
        "Attempted {} candidates: {} forked, {} duplicates, {} without content match, {} failed",
        report.attempted(),
        report.forked(),
        report.skipped_duplicate(),
        report.skipped_no_content_match(),
        report.failed()
    )?;
    Ok(())
}
