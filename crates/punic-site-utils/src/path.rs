//! Platform-neutral directory path normalization.
//!
//! Normalization never touches the filesystem: it only rewrites separators,
//! strips trailing `/` characters and rejects strings that cannot name a
//! directory on the target platform.

use std::env;
use std::ffi::OsStr;

/// Characters Windows refuses in path components, besides control characters.
const WINDOWS_RESERVED: &[char] = &['*', '?', '"', '<', '>', '|'];

/// Flavour of platform used to decide separators and rejected characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    /// Platform the process is running on.
    pub fn current() -> Self {
        Self::from_os_name(env::consts::OS)
    }

    /// Classifies an OS identifier; anything starting with `win`
    /// (case-insensitive) is Windows-like.
    pub fn from_os_name(name: &str) -> Self {
        let is_windows = name
            .get(..3)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("win"));
        if is_windows {
            Self::Windows
        } else {
            Self::Unix
        }
    }

    /// Native directory separator.
    pub fn separator(self) -> char {
        match self {
            Self::Windows => '\\',
            Self::Unix => '/',
        }
    }

    /// Normalizes `raw` into a `/`-separated path without trailing separators.
    ///
    /// Returns `None` when `raw` is not valid Unicode, is empty once trailing
    /// separators are stripped, or holds a character the platform rejects.
    pub fn normalize(self, raw: &OsStr) -> Option<String> {
        let raw = raw.to_str()?;
        let path = raw.replace(self.separator(), "/");
        let path = path.trim_end_matches('/');
        if path.is_empty() || path.chars().any(|ch| self.rejects(ch)) {
            return None;
        }
        Some(path.to_owned())
    }

    /// Renders a normalized path with the native separator.
    pub fn to_native(self, normalized: &str) -> String {
        normalized.replace('/', &self.separator().to_string())
    }

    fn rejects(self, ch: char) -> bool {
        match self {
            Self::Windows => u32::from(ch) < 0x20 || WINDOWS_RESERVED.contains(&ch),
            Self::Unix => false,
        }
    }
}

/// Normalizes `raw` for the running platform. See [`Platform::normalize`].
pub fn normalize_directory_path(raw: impl AsRef<OsStr>) -> Option<String> {
    Platform::current().normalize(raw.as_ref())
}
