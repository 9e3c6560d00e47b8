//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output: colored status
//! lines, the move progress bar, and the per-category summary table.
//! Diagnostics go through `tracing`; this module is for the user.

use crate::file_organizer::{FailureKind, OrganizeReport, OrganizeSummary};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Write;

/// Message shown when a run moved nothing.
pub const ALREADY_CLEAN: &str = "No files to organise - the folder is already clean.";

const COUNT_WIDTH: usize = 8;

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// ```no_run
    /// use tidyup::output::OutputFormatter;
    /// OutputFormatter::success("Done! Files have been organised successfully.");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Creates a progress bar for the move loop. The length is set once
    /// the directory has been listed.
    pub fn create_progress_bar() -> ProgressBar {
        let pb = ProgressBar::new(0);
        if let Ok(style) =
            ProgressStyle::default_bar().template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("█▓░"));
        }
        pb
    }

    /// Renders the summary table, or `None` when nothing was moved.
    ///
    /// Only categories with a non-zero count are listed, in category order,
    /// followed by a total row.
    ///
    /// ```
    /// use tidyup::file_category::Category;
    /// use tidyup::file_organizer::OrganizeSummary;
    /// use tidyup::output::OutputFormatter;
    ///
    /// let mut summary = OrganizeSummary::new();
    /// assert!(OutputFormatter::render_summary(&summary).is_none());
    ///
    /// summary.increment(Category::Images);
    /// let table = OutputFormatter::render_summary(&summary).unwrap();
    /// assert!(table.contains("| Images"));
    /// assert!(table.contains("| Total"));
    /// ```
    pub fn render_summary(summary: &OrganizeSummary) -> Option<String> {
        let total = summary.total();
        if total == 0 {
            return None;
        }

        let category_width = summary
            .iter()
            .map(|(category, _)| category.dir_name().len())
            .chain(["Category".len()])
            .max()
            .unwrap_or(0)
            + 2;

        let border = format!(
            "+{}+{}+",
            "-".repeat(category_width),
            "-".repeat(COUNT_WIDTH)
        );

        let mut out = String::new();
        let _ = writeln!(out, "{border}");
        let _ = writeln!(
            out,
            "|{:^cw$}|{:^nw$}|",
            "Category",
            "Count",
            cw = category_width,
            nw = COUNT_WIDTH
        );
        let _ = writeln!(out, "{border}");
        for (category, count) in summary.iter().filter(|(_, count)| *count > 0) {
            let _ = writeln!(out, "{}", Self::row(category.dir_name(), count, category_width));
        }
        let _ = writeln!(out, "{border}");
        let _ = writeln!(out, "{}", Self::row("Total", total, category_width));
        let _ = write!(out, "{border}");
        Some(out)
    }

    fn row(label: &str, count: usize, category_width: usize) -> String {
        format!(
            "| {:<cw$} | {:>nw$} |",
            label,
            count,
            cw = category_width - 2,
            nw = COUNT_WIDTH - 2
        )
    }

    /// Prints the summary table, or the "already clean" notice.
    pub fn print_summary(summary: &OrganizeSummary) {
        match Self::render_summary(summary) {
            Some(table) => {
                Self::header("Organisation Summary");
                Self::plain(&table);
            }
            None => {
                println!();
                Self::info(ALREADY_CLEAN);
            }
        }
    }

    /// Prints one warning per file that could not be moved.
    pub fn print_failures(report: &OrganizeReport) {
        for failure in &report.failures {
            let message = match failure.kind {
                FailureKind::Denied => format!(
                    "Permission denied - could not move '{}'. Skipping.",
                    failure.name
                ),
                FailureKind::Os => format!(
                    "OS error moving '{}': {}. Skipping.",
                    failure.name, failure.reason
                ),
            };
            Self::warning(&message);
        }
    }
}
