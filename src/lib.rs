//! tidyup - sort the files of a directory into category folders
//!
//! This library validates a target directory, creates one sub-folder per
//! category, and moves every visible file into the folder matching its
//! extension. Name clashes are resolved with numeric suffixes and the run
//! ends with a per-category summary.

pub mod cli;
pub mod collision;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod output;
pub mod validate;

pub use collision::{CollisionResolver, resolve_destination};
pub use config::{ConfigError, ExclusionFilter, ExclusionRules};
pub use file_category::{Category, ExtensionCatalog, classify, is_excluded};
pub use file_organizer::{OrganizeError, OrganizeReport, OrganizeSummary, Organizer};
pub use validate::{ValidationError, validate_path};

pub use cli::{CliError, RunOptions, run_cli};
