//! Command-line interface module for tidyup.
//!
//! This module handles all CLI-related functionality including:
//! - Argument definitions
//! - Validation of the target directory
//! - Loading optional exclusion rules
//! - Organization orchestration and reporting

use crate::config::{ConfigError, ExclusionRules};
use crate::file_organizer::{OrganizeError, OrganizeReport, Organizer};
use crate::output::OutputFormatter;
use crate::validate::{ValidationError, validate_path};
use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

/// Usage line printed when the arguments cannot be parsed.
pub const USAGE: &str = "Usage: tidyup <directory_path> [--dry-run] [--config <FILE>] [--json]";

/// Organize the files of a directory into category sub-folders.
#[derive(Parser, Debug, Clone)]
#[command(name = "tidyup", version, about)]
pub struct Cli {
    /// Directory whose files should be organized
    pub directory: PathBuf,

    /// Show what would be moved without touching the file system
    #[arg(long)]
    pub dry_run: bool,

    /// TOML file with additional exclusion rules
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the run report as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Settings for one organize run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub directory: PathBuf,
    pub dry_run: bool,
    pub config: Option<PathBuf>,
    pub json: bool,
}

impl RunOptions {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Default::default()
        }
    }
}

impl From<Cli> for RunOptions {
    fn from(cli: Cli) -> Self {
        Self {
            directory: cli.directory,
            dry_run: cli.dry_run,
            config: cli.config,
            json: cli.json,
        }
    }
}

/// Fatal errors. Each one ends the process with exit status 1.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Organize(#[from] OrganizeError),
    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Runs one organize pass and prints the result.
///
/// Files that fail to move are reported but do not make the run fail.
///
/// # Examples
///
/// ```no_run
/// use tidyup::cli::{RunOptions, run_cli};
///
/// match run_cli(&RunOptions::new("/path/to/directory")) {
///     Ok(report) => println!("{} files moved", report.summary.total()),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(options: &RunOptions) -> Result<OrganizeReport, CliError> {
    let base_path = validate_path(&options.directory)?;

    let filters = ExclusionRules::load(options.config.as_deref())?.compile()?;

    let mut organizer = Organizer::new(&base_path)
        .with_filters(filters)
        .dry_run(options.dry_run);

    if !options.json {
        if options.dry_run {
            OutputFormatter::dry_run_notice(&format!("Scanning: {}", base_path.display()));
        } else {
            OutputFormatter::info(&format!("Scanning: {}", base_path.display()));
        }
        organizer = organizer.with_progress(OutputFormatter::create_progress_bar());
    }

    tracing::info!(path = %base_path.display(), dry_run = options.dry_run, "Organizing directory");
    let report = organizer.organize()?;
    tracing::info!(
        moved = report.summary.total(),
        skipped = report.skipped.len(),
        failed = report.failures.len(),
        "Organize pass finished"
    );

    if options.json {
        OutputFormatter::plain(&serde_json::to_string_pretty(&report)?);
        return Ok(report);
    }

    OutputFormatter::print_failures(&report);
    OutputFormatter::print_summary(&report.summary);
    println!();

    if options.dry_run {
        OutputFormatter::dry_run_notice("Dry run complete. No files were modified.");
    } else if report.is_complete_success() {
        OutputFormatter::success("Done! Files have been organised successfully.");
    } else {
        OutputFormatter::warning(&format!(
            "Done, but {} file(s) could not be moved. See the messages above.",
            report.failures.len()
        ));
    }

    Ok(report)
}
