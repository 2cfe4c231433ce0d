//! Self-cleaning scratch directories.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{FsError, FsResult};
use crate::fs::{delete_recursive, ensure_directory, DeleteMode};
use crate::path::normalize_directory_path;

const NAME_PREFIX: &str = "volatile-";

/// Only the low 52 bits of the random token are used (13 hex digits).
const TOKEN_MASK: u64 = 0x000f_ffff_ffff_ffff;

/// A uniquely named directory that is deleted, with everything inside it,
/// when released or dropped.
///
/// Cleanup is best effort: failures are logged and never propagated.
#[derive(Debug)]
pub struct ScratchDirectory {
    path: PathBuf,
    released: bool,
}

impl ScratchDirectory {
    /// Creates a fresh `volatile-<counter>-<token>` directory under `parent`.
    ///
    /// `parent` must be an existing, writable directory.
    pub fn new(parent: impl AsRef<Path>) -> FsResult<Self> {
        let parent = normalize_directory_path(parent.as_ref().as_os_str())
            .ok_or(FsError::ScratchParentUnset)?;

        match fs::metadata(&parent) {
            Ok(metadata) if metadata.is_dir() => {
                if !is_writable(Path::new(&parent), &metadata) {
                    return Err(FsError::ScratchParentReadOnly { path: parent });
                }
            }
            _ => return Err(FsError::ScratchParentMissing { path: parent }),
        }

        let mut counter: u64 = 0;
        let path = loop {
            let candidate = PathBuf::from(format!(
                "{parent}/{NAME_PREFIX}{counter}-{}",
                unique_token()
            ));
            if fs::symlink_metadata(&candidate).is_err() {
                break candidate;
            }
            counter += 1;
        };

        ensure_directory(&path)?;
        info!(path = %path.display(), "created scratch directory");
        Ok(Self {
            path,
            released: false,
        })
    }

    /// Absolute path of the directory, `/`-separated and without trailing `/`.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the directory now instead of waiting for the value to drop.
    pub fn release(mut self) {
        self.cleanup();
    }

    fn cleanup(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(err) = delete_recursive(&self.path, DeleteMode::Everything) {
            warn!(
                path = %self.path.display(),
                error = %err,
                "failed to remove scratch directory"
            );
        }
    }
}

impl Drop for ScratchDirectory {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// Whether this process may create entries in `dir`.
#[cfg(unix)]
fn is_writable(dir: &Path, _metadata: &fs::Metadata) -> bool {
    use nix::unistd::{access, AccessFlags};

    access(dir, AccessFlags::W_OK).is_ok()
}

#[cfg(not(unix))]
fn is_writable(_dir: &Path, metadata: &fs::Metadata) -> bool {
    !metadata.permissions().readonly()
}

fn unique_token() -> String {
    format!("{:013x}", rand::random::<u64>() & TOKEN_MASK)
}
