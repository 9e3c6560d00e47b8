//! Optional exclusion rules.
//!
//! The extension table is compiled in and cannot be changed from outside.
//! What users can do is keep specific files in place by pointing
//! `--config` at a TOML file. Rules only ever exclude more entries, and
//! hidden files stay excluded whatever the file says.
//!
//! ```toml
//! [exclude]
//! names = ["Thumbs.db", "desktop.ini"]
//! extensions = ["part", "crdownload"]
//! globs = ["*.tmp"]
//! regex = ["^~\\$"]
//!
//! [include]
//! globs = ["keep-me.tmp"]
//! ```
//!
//! Unknown keys are rejected, so a misspelt rule fails loudly instead of
//! silently excluding nothing.

use glob::Pattern;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Invalid configuration in {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
    #[error("IO error reading configuration {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidGlobPattern { pattern: String, reason: String },
    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegexPattern { pattern: String, reason: String },
}

/// The rule file as written on disk.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExclusionRules {
    pub exclude: ExcludeSection,
    pub include: IncludeSection,
}

/// `[exclude]`: any match keeps the file where it is.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExcludeSection {
    /// Exact file names, compared case-sensitively.
    pub names: Vec<String>,
    /// Extensions with or without the leading dot, compared case-insensitively.
    pub extensions: Vec<String>,
    pub globs: Vec<String>,
    pub regex: Vec<String>,
}

/// `[include]`: globs that win over `[exclude]`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IncludeSection {
    pub globs: Vec<String>,
}

impl ExclusionRules {
    /// Reads the rule file at `path`, or returns the empty rule set when no
    /// path was given. Nothing is discovered implicitly.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
            _ => ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let rules = toml::from_str(&content).map_err(|e| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        tracing::debug!(path = %path.display(), "Loaded exclusion rules");
        Ok(rules)
    }

    /// Compiles every glob and regex once, up front.
    pub fn compile(self) -> Result<ExclusionFilter, ConfigError> {
        let ExclusionRules { exclude, include } = self;

        Ok(ExclusionFilter {
            names: exclude.names.into_iter().collect(),
            extensions: exclude
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            globs: compile_all(&exclude.globs, compile_glob)?,
            regexes: compile_all(&exclude.regex, compile_regex)?,
            keep: compile_all(&include.globs, compile_glob)?,
        })
    }
}

fn compile_all<T>(
    sources: &[String],
    compile: fn(&str) -> Result<T, ConfigError>,
) -> Result<Vec<T>, ConfigError> {
    sources.iter().map(|source| compile(source)).collect()
}

fn compile_glob(pattern: &str) -> Result<Pattern, ConfigError> {
    Pattern::new(pattern).map_err(|e| ConfigError::InvalidGlobPattern {
        pattern: pattern.to_string(),
        reason: e.msg.to_string(),
    })
}

fn compile_regex(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// Compiled exclusion rules, consulted once per candidate file.
///
/// The default value excludes nothing.
#[derive(Debug, Default)]
pub struct ExclusionFilter {
    names: HashSet<String>,
    extensions: HashSet<String>,
    globs: Vec<Pattern>,
    regexes: Vec<Regex>,
    keep: Vec<Pattern>,
}

impl ExclusionFilter {
    /// True when a rule keeps `file_name` in place.
    ///
    /// Hidden files never reach this check; see
    /// [`crate::file_category::is_excluded`].
    pub fn excludes(&self, file_name: &str) -> bool {
        if self.keep.iter().any(|glob| glob.matches(file_name)) {
            return false;
        }

        self.names.contains(file_name)
            || crate::file_category::extension_of(file_name)
                .is_some_and(|ext| self.extensions.contains(ext.trim_start_matches('.')))
            || self.globs.iter().any(|glob| glob.matches(file_name))
            || self.regexes.iter().any(|regex| regex.is_match(file_name))
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
            && self.extensions.is_empty()
            && self.globs.is_empty()
            && self.regexes.is_empty()
    }
}
