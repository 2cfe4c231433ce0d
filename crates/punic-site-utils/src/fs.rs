//! Recursive deletion with bounded retry, and idempotent directory creation.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{FsError, FsResult};

/// Attempts made for every unlink/rmdir before giving up.
pub const MAX_ATTEMPTS: u32 = 5;

/// What [`delete_recursive`] removes when the target is a directory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeleteMode {
    /// Remove the directory together with its contents.
    #[default]
    Everything,
    /// Remove the contents and keep the (now empty) directory.
    ContentsOnly,
}

/// Runs `operation` until it succeeds or `attempts` runs are used up.
///
/// Attempts are immediate, without backoff. The error of the last attempt
/// is returned on exhaustion. `attempts` below one still runs once.
pub fn retry<T, E, F>(attempts: u32, mut operation: F) -> Result<T, E>
where
    E: fmt::Display,
    F: FnMut() -> Result<T, E>,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match operation() {
            Ok(value) => return Ok(value),
            Err(err) if attempt >= attempts => return Err(err),
            Err(err) => {
                debug!(attempt, attempts, error = %err, "attempt failed, retrying");
                attempt += 1;
            }
        }
    }
}

/// Deletes `path` from the filesystem.
///
/// Files and symbolic links are unlinked. Directories are emptied
/// depth-first and then removed, unless `mode` is
/// [`DeleteMode::ContentsOnly`]. Symbolic links are never followed. A path
/// that cannot be inspected (usually because it does not exist) is left
/// alone.
///
/// Entries are visited in file-name order. Entries removed before a failure
/// stay removed.
pub fn delete_recursive(path: &Path, mode: DeleteMode) -> FsResult<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "nothing to delete");
            return Ok(());
        }
    };

    if !metadata.is_dir() {
        return delete_file(path);
    }

    let entries = WalkDir::new(path)
        .min_depth(1)
        .contents_first(true)
        .follow_links(false)
        .sort_by_file_name();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if vanished(&err) => continue,
            Err(err) => {
                let failed = err.path().unwrap_or(path).to_path_buf();
                return Err(FsError::ListDirectory {
                    path: failed,
                    source: err.into(),
                });
            }
        };
        if entry.file_type().is_dir() {
            delete_empty_directory(entry.path())?;
        } else {
            delete_file(entry.path())?;
        }
    }

    if mode == DeleteMode::Everything {
        delete_empty_directory(path)?;
    }
    Ok(())
}

/// Creates `path` and any missing ancestors. Existing directories are left
/// untouched, whatever their permissions.
pub fn ensure_directory(path: &Path) -> FsResult<()> {
    if path.is_dir() {
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o777);
    }

    builder
        .create(path)
        .map_err(|source| FsError::CreateDirectory {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(path = %path.display(), "created directory");
    Ok(())
}

fn delete_file(path: &Path) -> FsResult<()> {
    retry(MAX_ATTEMPTS, || tolerate_absence(fs::remove_file(path))).map_err(|source| {
        FsError::DeleteFile {
            path: path.to_path_buf(),
            source,
        }
    })?;
    debug!(path = %path.display(), "deleted file");
    Ok(())
}

fn delete_empty_directory(path: &Path) -> FsResult<()> {
    retry(MAX_ATTEMPTS, || tolerate_absence(fs::remove_dir(path))).map_err(|source| {
        FsError::DeleteDirectory {
            path: path.to_path_buf(),
            source,
        }
    })?;
    debug!(path = %path.display(), "deleted directory");
    Ok(())
}

/// Something else removing the target between attempts counts as success.
fn tolerate_absence(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

fn vanished(err: &walkdir::Error) -> bool {
    err.io_error()
        .is_some_and(|io_err| io_err.kind() == io::ErrorKind::NotFound)
}
