//! End-of-run report on stdout.
//!
//! Log records already go to the console through the log subscriber; this
//! module prints the human-oriented table that closes a run.

use crate::file_organizer::{FailureKind, Summary};
use colored::*;
use std::collections::BTreeMap;

/// Prints the run summary with consistent styling.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Prints a summary table with file counts by category.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dirsort::output::OutputFormatter;
    /// use std::collections::BTreeMap;
    ///
    /// let mut counts = BTreeMap::new();
    /// counts.insert("Documents".to_string(), 15);
    /// counts.insert("Images".to_string(), 8);
    /// OutputFormatter::summary_table(&counts, 23);
    /// ```
    pub fn summary_table(category_counts: &BTreeMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let max_category_len = category_counts
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0)
            .max(8); // At least "Category" width

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = max_category_len
        );
        println!("{}", "-".repeat(max_category_len + 10));

        for (category, count) in category_counts {
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                file_word(*count),
                width = max_category_len
            );
        }

        println!("{}", "-".repeat(max_category_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            file_word(total_files),
            width = max_category_len
        );
    }

    /// Prints the full report for one organizer pass.
    pub fn report(summary: &Summary, dry_run: bool) {
        if summary.is_empty() {
            Self::success("Nothing to organize.");
            return;
        }

        Self::summary_table(&summary.category_counts(), summary.moved_count());

        if summary.skipped > 0 {
            println!("Excluded: {} {}", summary.skipped, file_word(summary.skipped));
        }

        if !summary.failed.is_empty() {
            Self::warning(&format!(
                "{} {} could not be organized:",
                summary.failed_count(),
                file_word(summary.failed_count())
            ));
            for failure in &summary.failed {
                println!(
                    "  {} {} ({})",
                    "✗".red(),
                    failure.file_name,
                    failure_label(failure.kind)
                );
            }
        }

        if dry_run {
            Self::dry_run_notice("No files were modified.");
        } else if summary.failed.is_empty() {
            Self::success("Organization complete!");
        }
    }
}

fn file_word(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}

fn failure_label(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::PermissionDenied => "permission denied",
        FailureKind::DestinationCreateFailed => "could not create folder",
        FailureKind::MoveFailed => "move failed",
    }
}
