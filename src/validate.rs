//! Target directory validation.
//!
//! Runs before anything is created or moved: a path that fails here leaves
//! the file system untouched.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Reasons a target path cannot be organized.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("The path '{}' does not exist.", path.display())]
    NotFound { path: PathBuf },

    #[error("'{}' is not a directory.", path.display())]
    NotADirectory { path: PathBuf },

    #[error("Insufficient permissions for '{}'.", path.display())]
    InsufficientPermissions {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Checks that `path` is an existing, readable and writable directory.
///
/// An empty path means the current directory. Returns the canonical
/// absolute path on success.
///
/// # Examples
///
/// ```
/// use tidyup::validate::{validate_path, ValidationError};
///
/// let dir = tempfile::tempdir().unwrap();
/// assert!(validate_path(dir.path()).is_ok());
///
/// let missing = dir.path().join("missing");
/// assert!(matches!(
///     validate_path(&missing),
///     Err(ValidationError::NotFound { .. })
/// ));
/// ```
pub fn validate_path(path: &Path) -> Result<PathBuf, ValidationError> {
    let path = if path.as_os_str().is_empty() {
        Path::new(".")
    } else {
        path
    };
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    let resolved = fs::canonicalize(&absolute).map_err(|e| lookup_error(&absolute, e))?;
    let metadata = fs::metadata(&resolved).map_err(|e| lookup_error(&resolved, e))?;

    if !metadata.is_dir() {
        return Err(ValidationError::NotADirectory { path: resolved });
    }

    // The directory must be listable.
    if let Err(e) = fs::read_dir(&resolved) {
        return Err(ValidationError::InsufficientPermissions {
            path: resolved,
            source: e,
        });
    }

    if let Err(e) = check_access(&resolved) {
        return Err(ValidationError::InsufficientPermissions {
            path: resolved,
            source: e,
        });
    }

    tracing::debug!(path = %resolved.display(), "Validated target directory");
    Ok(resolved)
}

fn lookup_error(path: &Path, e: io::Error) -> ValidationError {
    match e.kind() {
        ErrorKind::PermissionDenied => ValidationError::InsufficientPermissions {
            path: path.to_path_buf(),
            source: e,
        },
        _ => ValidationError::NotFound {
            path: path.to_path_buf(),
        },
    }
}

/// Read and write access for the calling user, as `access(2)` reports it.
#[cfg(unix)]
fn check_access(path: &Path) -> io::Result<()> {
    use rustix::fs::{Access, access};

    access(path, Access::READ_OK | Access::WRITE_OK).map_err(io::Error::from)
}

#[cfg(not(unix))]
fn check_access(path: &Path) -> io::Result<()> {
    if fs::metadata(path)?.permissions().readonly() {
        return Err(io::Error::new(
            ErrorKind::PermissionDenied,
            "directory is read-only",
        ));
    }
    Ok(())
}
