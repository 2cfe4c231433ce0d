//! Command-line configuration for the punic-site builder.
//!
//! A run is configured by three directories: a temporary directory for
//! scratch work, an optional local checkout of Punic, and the output
//! directory the generated site is written to. Defaults come from the
//! injected [`Environment`]; explicit options override them.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

mod environment;
mod options;

pub use environment::Environment;
pub use options::{help_text, OptionName, Options, ParseOutcome};

/// Errors caused by an invalid invocation. Their messages are meant to be
/// shown to the user verbatim.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("Unknown option: {key}\nUse -h (or --help) to get the list of available options")]
    UnknownOption { key: String },

    #[error("Please specify {}", .option.missing_value_hint())]
    MissingValue { option: OptionName },

    #[error("Unable to find the directory {value}")]
    DirectoryNotFound { option: OptionName, value: String },

    #[error("Invalid output directory {value}")]
    InvalidOutputDirectory { value: String },

    #[error("Unable to determine the install directory")]
    InstallDirectory {
        #[source]
        source: io::Error,
    },

    #[error("Invalid default {what} directory {}", .path.display())]
    InvalidDefault { what: &'static str, path: PathBuf },
}
