/// Destination name resolution.
///
/// When a file named `photo.jpg` already exists in the destination folder,
/// the incoming file is renamed to `photo_1.jpg`, then `photo_2.jpg`, and so
/// on until a free name is found.
use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Hands out non-colliding destination paths.
///
/// Besides probing the file system, a resolver remembers every path it has
/// returned, so two calls never yield the same path within a run even if
/// the first one was never written (as in a dry run).
#[derive(Debug, Default)]
pub struct CollisionResolver {
    claimed: HashSet<PathBuf>,
}

impl CollisionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a free path for `file_name` inside `destination_folder`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidyup::collision::CollisionResolver;
    /// use std::ffi::OsStr;
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// std::fs::write(dir.path().join("photo.jpg"), b"").unwrap();
    ///
    /// let mut resolver = CollisionResolver::new();
    /// let dest = resolver.resolve(dir.path(), OsStr::new("photo.jpg"));
    /// assert_eq!(dest, dir.path().join("photo_1.jpg"));
    /// ```
    pub fn resolve(&mut self, destination_folder: &Path, file_name: &OsStr) -> PathBuf {
        let direct = destination_folder.join(file_name);
        if !self.is_taken(&direct) {
            self.claimed.insert(direct.clone());
            return direct;
        }

        let (stem, extension) = split_file_name(file_name);
        let mut counter: u64 = 1;
        loop {
            let candidate = destination_folder.join(numbered_name(&stem, extension, counter));
            if !self.is_taken(&candidate) {
                tracing::debug!(
                    original = %direct.display(),
                    resolved = %candidate.display(),
                    "Resolved name collision"
                );
                self.claimed.insert(candidate.clone());
                return candidate;
            }
            counter += 1;
        }
    }

    /// Gives back a path handed out by [`resolve`](Self::resolve) whose move
    /// did not happen, so later files may use that name again.
    pub fn release(&mut self, path: &Path) {
        self.claimed.remove(path);
    }

    fn is_taken(&self, path: &Path) -> bool {
        self.claimed.contains(path) || path.symlink_metadata().is_ok()
    }
}

/// Resolves a single destination without remembering earlier results.
pub fn resolve_destination(destination_folder: &Path, file_name: &OsStr) -> PathBuf {
    CollisionResolver::new().resolve(destination_folder, file_name)
}

/// Splits a file name into stem and extension (without the dot).
///
/// A leading dot belongs to the stem, and a trailing dot gives an empty
/// extension so `file.` becomes `file_1.`.
fn split_file_name(file_name: &OsStr) -> (OsString, Option<&OsStr>) {
    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .map(OsStr::to_os_string)
        .unwrap_or_else(|| file_name.to_os_string());
    (stem, path.extension())
}

fn numbered_name(stem: &OsStr, extension: Option<&OsStr>, counter: u64) -> OsString {
    let mut name = stem.to_os_string();
    name.push(format!("_{counter}"));
    if let Some(ext) = extension {
        name.push(".");
        name.push(ext);
    }
    name
}
