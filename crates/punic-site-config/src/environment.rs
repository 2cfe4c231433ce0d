use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use punic_site_utils::normalize_directory_path;

use crate::OptionsError;

/// Name of the output directory created next to the install directory.
const DEFAULT_OUTPUT_NAME: &str = "docs";

/// Process-level inputs the default configuration is derived from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Environment {
    pub temp_dir: PathBuf,
    pub install_dir: PathBuf,
}

impl Environment {
    pub fn new(temp_dir: impl Into<PathBuf>, install_dir: impl Into<PathBuf>) -> Self {
        Self {
            temp_dir: temp_dir.into(),
            install_dir: install_dir.into(),
        }
    }

    /// Reads the system temp directory and the directory holding the running
    /// executable. Binaries run from a Cargo `target/` tree resolve to the
    /// workspace root instead.
    pub fn detect() -> Result<Self, OptionsError> {
        let exe = env::current_exe().map_err(|source| OptionsError::InstallDirectory { source })?;
        Ok(Self::new(env::temp_dir(), install_dir_of(&exe)))
    }

    pub fn with_temp_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.temp_dir = path.into();
        self
    }

    pub fn with_install_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.install_dir = path.into();
        self
    }

    /// Normalized system temp directory.
    pub fn default_temp_directory(&self) -> Result<String, OptionsError> {
        normalize_directory_path(&self.temp_dir).ok_or_else(|| OptionsError::InvalidDefault {
            what: "temporary",
            path: self.temp_dir.clone(),
        })
    }

    /// Normalized `<install_dir>/docs`.
    pub fn default_output_directory(&self) -> Result<String, OptionsError> {
        let candidate = self.install_dir.join(DEFAULT_OUTPUT_NAME);
        normalize_directory_path(&candidate).ok_or(OptionsError::InvalidDefault {
            what: "output",
            path: candidate,
        })
    }
}

fn install_dir_of(exe: &Path) -> PathBuf {
    let mut dir = exe.parent().unwrap_or_else(|| Path::new("."));
    if dir.file_name() == Some(OsStr::new("deps")) {
        dir = dir.parent().unwrap_or(dir);
    }
    // target/<profile>/punic-site
    match dir.parent() {
        Some(target) if target.file_name() == Some(OsStr::new("target")) => {
            target.parent().unwrap_or(target).to_path_buf()
        }
        _ => dir.to_path_buf(),
    }
}
