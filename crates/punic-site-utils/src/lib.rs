//! Shared filesystem utilities for the punic-site crates.
//!
//! Everything here is synchronous and blocking. Paths handed back to callers
//! always use `/` as separator and never carry a trailing separator.

pub mod error;
pub mod fs;
pub mod path;
pub mod scratch;

pub use error::{FsError, FsResult};
pub use fs::{delete_recursive, ensure_directory, retry, DeleteMode, MAX_ATTEMPTS};
pub use path::{normalize_directory_path, Platform};
pub use scratch::ScratchDirectory;
