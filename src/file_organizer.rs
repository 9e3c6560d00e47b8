/// Moving files into category directories.
///
/// This module provisions the category folders under a base directory and
/// runs the organize pass: a single, non-recursive sweep of the base
/// directory that moves every eligible file into its category folder.
/// A failure on one file is recorded and the sweep carries on.
use crate::collision::CollisionResolver;
use crate::config::ExclusionFilter;
use crate::file_category::{Category, classify, is_excluded};
use indicatif::ProgressBar;
use serde::Serialize;
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that abort an organize run.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// A category folder could not be created.
    #[error("Failed to create directory {}: {source}", path.display())]
    ProvisionFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The base directory could not be listed.
    #[error("Failed to read directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Creates every category folder directly under `base_path`.
///
/// Folders that already exist are left alone. Returns the folders that were
/// actually created, in category order.
pub fn ensure_category_folders(
    base_path: &Path,
    categories: &[Category],
) -> OrganizeResult<Vec<PathBuf>> {
    let mut created = Vec::new();

    for category in categories {
        let folder = base_path.join(category.dir_name());
        match fs::create_dir(&folder) {
            Ok(()) => {
                tracing::debug!(folder = %folder.display(), "Created category folder");
                created.push(folder);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists && folder.is_dir() => {}
            Err(e) => {
                return Err(OrganizeError::ProvisionFailure {
                    path: folder,
                    source: e,
                });
            }
        }
    }

    Ok(created)
}

/// Per-category counts of moved files.
///
/// Every category starts at zero; counts only ever go up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizeSummary {
    counts: HashMap<Category, usize>,
}

impl OrganizeSummary {
    pub fn new() -> Self {
        Self {
            counts: Category::ALL.iter().map(|&c| (c, 0)).collect(),
        }
    }

    pub fn increment(&mut self, category: Category) {
        *self.counts.entry(category).or_insert(0) += 1;
    }

    pub fn count(&self, category: Category) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Counts in category display order, including zeros.
    pub fn iter(&self) -> impl Iterator<Item = (Category, usize)> + '_ {
        Category::ALL.iter().map(|&c| (c, self.count(c)))
    }
}

impl Default for OrganizeSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for OrganizeSummary {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(Category::ALL.len()))?;
        for (category, count) in self.iter() {
            map.serialize_entry(category.dir_name(), &count)?;
        }
        map.end()
    }
}

/// A file that was moved (or, in a dry run, would be moved).
#[derive(Debug, Clone, Serialize)]
pub struct MovedFile {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub category: Category,
}

/// Why an entry was left out of the organize pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Name starts with a dot.
    Hidden,
    /// Matched a user exclusion rule.
    Filtered,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedEntry {
    pub name: String,
    pub reason: SkipReason,
}

/// How a move failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Permission denied.
    Denied,
    /// Any other I/O error.
    Os,
}

/// A file that could not be moved. It stays at its original location.
#[derive(Debug, Clone, Serialize)]
pub struct MoveFailure {
    pub name: String,
    pub destination: PathBuf,
    pub kind: FailureKind,
    pub reason: String,
}

impl MoveFailure {
    fn new(name: String, destination: PathBuf, error: &io::Error) -> Self {
        let kind = match error.kind() {
            ErrorKind::PermissionDenied => FailureKind::Denied,
            _ => FailureKind::Os,
        };
        Self {
            name,
            destination,
            kind,
            reason: error.to_string(),
        }
    }
}

/// Everything that happened during one organize run.
#[derive(Debug, Clone, Serialize)]
pub struct OrganizeReport {
    pub base_path: PathBuf,
    pub dry_run: bool,
    pub summary: OrganizeSummary,
    pub moved: Vec<MovedFile>,
    pub skipped: Vec<SkippedEntry>,
    pub failures: Vec<MoveFailure>,
    /// RFC 3339 timestamp of when the run finished.
    pub finished_at: String,
}

impl OrganizeReport {
    fn new(base_path: PathBuf, dry_run: bool) -> Self {
        Self {
            base_path,
            dry_run,
            summary: OrganizeSummary::new(),
            moved: Vec::new(),
            skipped: Vec::new(),
            failures: Vec::new(),
            finished_at: String::new(),
        }
    }

    /// Number of non-directory entries the run looked at.
    pub fn total_processed(&self) -> usize {
        self.summary.total() + self.skipped.len() + self.failures.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Moves `source` to `destination`.
///
/// Uses an atomic rename. When source and destination live on different
/// devices it falls back to copy + remove.
pub fn move_file(source: &Path, destination: &Path) -> io::Result<()> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            tracing::warn!(
                error = %e,
                source = %source.display(),
                "Atomic rename failed, falling back to copy+remove"
            );
            move_across_devices(
                source,
                destination,
                |s: &Path, d: &Path| fs::copy(s, d),
                |p: &Path| fs::remove_file(p),
            )
        }
        Err(e) => Err(e),
    }
}

/// Copy + remove fallback for moves between devices.
///
/// If either step fails the destination is deleted again, so the file only
/// ever exists in one place. Symlinks are not copied: `fs::copy` would
/// follow them and turn the link into a regular file, so the link stays
/// where it is and the move is reported as failed.
fn move_across_devices<C, R>(
    source: &Path,
    destination: &Path,
    copy: C,
    remove: R,
) -> io::Result<()>
where
    C: FnOnce(&Path, &Path) -> io::Result<u64>,
    R: FnOnce(&Path) -> io::Result<()>,
{
    if fs::symlink_metadata(source)?.file_type().is_symlink() {
        return Err(io::Error::new(
            ErrorKind::CrossesDevices,
            format!(
                "symbolic link {} cannot be moved across devices",
                source.display()
            ),
        ));
    }

    if let Err(copy_err) = copy(source, destination) {
        discard_partial_copy(destination);
        return Err(copy_err);
    }
    if let Err(remove_err) = remove(source) {
        discard_partial_copy(destination);
        return Err(remove_err);
    }
    Ok(())
}

fn discard_partial_copy(destination: &Path) {
    match fs::remove_file(destination) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            error = %e,
            destination = %destination.display(),
            "Could not remove copy after failed move"
        ),
    }
}

/// Runs the organize pass over one base directory.
///
/// # Examples
///
/// ```no_run
/// use tidyup::file_organizer::Organizer;
/// use std::path::Path;
///
/// let report = Organizer::new(Path::new("/path/to/downloads"))
///     .organize()
///     .expect("organize failed");
/// println!("moved {} files", report.summary.total());
/// ```
pub struct Organizer {
    base_path: PathBuf,
    filters: ExclusionFilter,
    dry_run: bool,
    progress: Option<ProgressBar>,
    mover: fn(&Path, &Path) -> io::Result<()>,
}

impl Organizer {
    pub fn new(base_path: &Path) -> Self {
        Self {
            base_path: base_path.to_path_buf(),
            filters: ExclusionFilter::default(),
            dry_run: false,
            progress: None,
            mover: move_file,
        }
    }

    pub fn with_filters(mut self, filters: ExclusionFilter) -> Self {
        self.filters = filters;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Advances `progress` once per candidate file.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    #[cfg(test)]
    fn with_mover(mut self, mover: fn(&Path, &Path) -> io::Result<()>) -> Self {
        self.mover = mover;
        self
    }

    /// Sorted listing of the base directory: (name, is_dir).
    fn scan(&self) -> OrganizeResult<Vec<(OsString, bool)>> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| OrganizeError::ReadDir {
            path: self.base_path.clone(),
            source: e,
        })?;

        let mut listing = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable directory entry");
                    continue;
                }
            };
            // Symlinks are followed so a link to a directory counts as one.
            let is_dir = match entry.file_type() {
                Ok(ft) if ft.is_symlink() => entry.path().is_dir(),
                Ok(ft) => ft.is_dir(),
                Err(_) => entry.path().is_dir(),
            };
            listing.push((entry.file_name(), is_dir));
        }

        listing.sort();
        Ok(listing)
    }

    /// Provisions the category folders and moves every eligible file.
    ///
    /// In dry-run mode nothing is created or moved; the report describes
    /// what a real run would do.
    pub fn organize(&self) -> OrganizeResult<OrganizeReport> {
        if !self.dry_run {
            ensure_category_folders(&self.base_path, &Category::ALL)?;
        }

        let listing = self.scan()?;
        let mut report = OrganizeReport::new(self.base_path.clone(), self.dry_run);
        let mut resolver = CollisionResolver::new();

        let candidates = listing.iter().filter(|(_, is_dir)| !is_dir).count();
        if let Some(pb) = &self.progress {
            pb.set_length(candidates as u64);
        }

        for (os_name, is_dir) in &listing {
            if *is_dir {
                continue;
            }
            let name = os_name.to_string_lossy().into_owned();

            if is_excluded(&name) {
                tracing::debug!(file = %name, "Skipping hidden file");
                report.skipped.push(SkippedEntry {
                    name,
                    reason: SkipReason::Hidden,
                });
                self.tick();
                continue;
            }

            if self.filters.excludes(&name) {
                tracing::debug!(file = %name, "Skipping file matched by exclusion rules");
                report.skipped.push(SkippedEntry {
                    name,
                    reason: SkipReason::Filtered,
                });
                self.tick();
                continue;
            }

            let category = classify(&name);
            let source = self.base_path.join(os_name);
            let destination = resolver.resolve(&self.base_path.join(category.dir_name()), os_name);

            if !self.dry_run
                && let Err(e) = (self.mover)(&source, &destination)
            {
                tracing::debug!(file = %name, error = %e, "Could not move file");
                resolver.release(&destination);
                report
                    .failures
                    .push(MoveFailure::new(name, destination, &e));
                self.tick();
                continue;
            }

            tracing::info!(
                file = %name,
                category = %category,
                destination = %destination.display(),
                dry_run = self.dry_run,
                "Organized file"
            );
            report.summary.increment(category);
            report.moved.push(MovedFile {
                source,
                destination,
                category,
            });
            self.tick();
        }

        if let Some(pb) = &self.progress {
            pb.finish_and_clear();
        }

        report.finished_at = chrono::Utc::now().to_rfc3339();
        Ok(report)
    }

    fn tick(&self) {
        if let Some(pb) = &self.progress {
            pb.inc(1);
        }
    }
}

/// Convenience wrapper: organizes `base_path` with no exclusion rules.
pub fn organize(base_path: &Path) -> OrganizeResult<OrganizeReport> {
    Organizer::new(base_path).organize()
}
