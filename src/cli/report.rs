//! Run report formatting and printing.
//!
//! Kept out of `core` so the extractor can be used as a library without
//! console output.

use std::io::{self, Write};

use colored::Colorize;

use crate::core::{FileError, RunSummary};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print the run summary to stdout and per-file errors to stderr.
pub fn print_summary(summary: &RunSummary, verbose: bool) {
    print_file_errors_to(&summary.file_errors, &mut io::stderr().lock());
    print_access_warning_to(summary.skipped_paths, verbose, &mut io::stderr().lock());
    print_summary_to(summary, verbose, &mut io::stdout().lock());
}

pub fn print_summary_to<W: Write>(summary: &RunSummary, verbose: bool, writer: &mut W) {
    if verbose {
        for path in &summary.processed_files {
            let note = if summary.rewritten_files.contains(path) {
                "rewritten"
            } else {
                "unchanged"
            };
            let _ = writeln!(
                writer,
                "{} {} {}",
                SUCCESS_MARK.green(),
                path.display(),
                format!("({})", note).dimmed()
            );
        }
        let _ = writeln!(
            writer,
            "Scanned {} {}, matched {} {} ({} in templates, {} in scripts)",
            summary.files_found,
            if summary.files_found == 1 {
                "file"
            } else {
                "files"
            },
            summary.spans.total(),
            if summary.spans.total() == 1 {
                "span"
            } else {
                "spans"
            },
            summary.spans.template,
            summary.spans.script
        );
    }

    let _ = writeln!(writer, "Processed files: {}", summary.processed_count());
    let _ = writeln!(writer, "Extracted texts: {}", summary.extracted_count());

    match &summary.dictionary {
        Some(stats) => {
            let _ = writeln!(
                writer,
                "Dictionary {}: {} added, {} updated, {} unchanged",
                summary.dictionary_path.display(),
                stats.added,
                stats.updated,
                stats.unchanged
            );
        }
        None if summary.dry_run => {
            let _ = writeln!(
                writer,
                "{} {} {} would be rewritten, nothing was written",
                "dry run:".bold().cyan(),
                summary.rewritten_files.len(),
                if summary.rewritten_files.len() == 1 {
                    "file"
                } else {
                    "files"
                }
            );
        }
        None => {}
    }

    let failed = summary.file_errors.len();
    if failed == 0 {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Extracted {} {} from {} {}",
                summary.extracted_count(),
                if summary.extracted_count() == 1 {
                    "text"
                } else {
                    "texts"
                },
                summary.processed_count(),
                if summary.processed_count() == 1 {
                    "file"
                } else {
                    "files"
                }
            )
            .green()
        );
    } else {
        let _ = writeln!(
            writer,
            "{} {}",
            FAILURE_MARK.red(),
            format!(
                "{} {} could not be processed",
                failed,
                if failed == 1 { "file" } else { "files" }
            )
            .red()
        );
    }
}

pub fn print_file_errors_to<W: Write>(errors: &[FileError], writer: &mut W) {
    for error in errors {
        let _ = writeln!(
            writer,
            "{} {}: {}",
            "error:".bold().red(),
            error.path.display(),
            error.message
        );
    }
}

/// Warn about paths the scanner could not access.
pub fn print_access_warning_to<W: Write>(count: usize, verbose: bool, writer: &mut W) {
    if count > 0 && !verbose {
        let _ = writeln!(
            writer,
            "{} {} path(s) could not be accessed (use {} for details)",
            "warning:".bold().yellow(),
            count,
            "-v".cyan()
        );
    }
}
