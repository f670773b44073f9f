use dss_core::process::{FileReport, FileStatus, RunSummary};
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// One `[marker] path` line plus indented detail. Passing and skipped files
/// are only shown when `verbose`.
pub fn print_report(report: &FileReport, verbose: bool, dry_run: bool) {
    if report.status != FileStatus::Failed && !verbose && !report.modified {
        return;
    }

    match &report.skip_reason {
        Some(reason) => println!("[{}] {} ({reason})", report.status.marker(), report.path),
        None => println!("[{}] {}", report.status.marker(), report.path),
    }
    for err in &report.errors {
        println!("  error: {err}");
    }
    for note in &report.corrections {
        println!("  fixed: {note}");
    }
    if report.modified {
        if dry_run {
            println!("  would modify (dry run)");
        } else if report.written {
            println!("  modified");
        }
    }
}

pub fn print_summary(summary: &RunSummary) {
    println!();
    println!(
        "Summary: {} files, {} passed, {} failed, {} modified, {} skipped",
        summary.total, summary.passed, summary.failed, summary.modified, summary.skipped
    );
}
