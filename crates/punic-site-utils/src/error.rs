use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by the filesystem helpers once their retries are exhausted.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("Failed to delete the file {}", .path.display())]
    DeleteFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to retrieve the contents of the directory {}", .path.display())]
    ListDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to delete the directory {}", .path.display())]
    DeleteDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create the directory {}", .path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unable to retrieve the temporary directory.")]
    ScratchParentUnset,

    #[error("The temporary directory {path} does not exist.")]
    ScratchParentMissing { path: String },

    #[error("The temporary directory {path} is not writable.")]
    ScratchParentReadOnly { path: String },
}

pub type FsResult<T> = Result<T, FsError>;
