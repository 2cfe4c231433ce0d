use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use punic_site_utils::{normalize_directory_path, Platform};
use tracing::debug;

use crate::{Environment, OptionsError};

/// Options that take a directory value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionName {
    Temp,
    Punic,
    Output,
}

impl OptionName {
    fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "-t" | "--temp" => Some(Self::Temp),
            "-p" | "--punic" => Some(Self::Punic),
            "-o" | "--output" => Some(Self::Output),
            _ => None,
        }
    }

    pub(crate) fn missing_value_hint(self) -> &'static str {
        match self {
            Self::Temp => "the path of the temporary directory",
            Self::Punic => "where Punic resides",
            Self::Output => "the path of the output directory",
        }
    }
}

/// Result of scanning the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Run with the resolved options.
    Run(Options),
    /// The user asked for help; the payload is the text to print.
    Help(String),
}

/// Resolved, validated configuration. Immutable once parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    temp_directory: PathBuf,
    punic_directory: Option<PathBuf>,
    output_directory: PathBuf,
}

impl Options {
    /// Configuration used when no option is given.
    pub fn defaults(env: &Environment) -> Result<Self, OptionsError> {
        Overrides::default().resolve(env)
    }

    /// Scans `args` (program name excluded) left to right.
    ///
    /// Long options accept `--name=value` as well as `--name value`; short
    /// options only the separate-token form. Keys are case-insensitive. A
    /// value-taking option given as the last token gets an empty value and
    /// is rejected by its own validation. Scanning stops at the first error
    /// or at `-h`/`--help`. Environment defaults are only consulted for
    /// options that were not given.
    pub fn parse_from<I, T>(args: I, env: &Environment) -> Result<ParseOutcome, OptionsError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let mut overrides = Overrides::default();

        let mut index = 0;
        while index < args.len() {
            let token = &args[index];
            let (key, value, consumed) = match split_inline(token) {
                Some((key, value)) => (key.to_owned(), OsString::from(value), 1),
                None => (
                    token.to_string_lossy().into_owned(),
                    args.get(index + 1).cloned().unwrap_or_default(),
                    2,
                ),
            };

            let lowered = key.to_ascii_lowercase();
            if lowered == "-h" || lowered == "--help" {
                return Ok(ParseOutcome::Help(help_text(env)));
            }
            let option = OptionName::from_key(&key).ok_or(OptionsError::UnknownOption { key })?;
            overrides.apply(option, &value)?;
            index += consumed;
        }

        let options = overrides.resolve(env)?;
        debug!(?options, "parsed command-line options");
        Ok(ParseOutcome::Run(options))
    }

    /// Directory the scratch workspace is created in.
    pub fn temp_directory(&self) -> &Path {
        &self.temp_directory
    }

    /// Local Punic checkout; `None` means the latest release is fetched.
    pub fn punic_directory(&self) -> Option<&Path> {
        self.punic_directory.as_deref()
    }

    /// Directory the generated site is written to. It may not exist yet.
    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }
}

/// Values collected while scanning; unset entries fall back to the
/// environment when resolved.
#[derive(Debug, Default)]
struct Overrides {
    temp_directory: Option<PathBuf>,
    punic_directory: Option<PathBuf>,
    output_directory: Option<PathBuf>,
}

impl Overrides {
    fn apply(&mut self, option: OptionName, value: &OsStr) -> Result<(), OptionsError> {
        if value.is_empty() {
            return Err(OptionsError::MissingValue { option });
        }
        let normalized = normalize_directory_path(value);
        match option {
            OptionName::Temp => {
                self.temp_directory = Some(existing_directory(option, value, normalized)?)
            }
            OptionName::Punic => {
                self.punic_directory = Some(existing_directory(option, value, normalized)?)
            }
            OptionName::Output => {
                let path = normalized.ok_or_else(|| OptionsError::InvalidOutputDirectory {
                    value: value.to_string_lossy().into_owned(),
                })?;
                self.output_directory = Some(PathBuf::from(path));
            }
        }
        Ok(())
    }

    fn resolve(self, env: &Environment) -> Result<Options, OptionsError> {
        let temp_directory = match self.temp_directory {
            Some(path) => path,
            None => PathBuf::from(env.default_temp_directory()?),
        };
        let output_directory = match self.output_directory {
            Some(path) => path,
            None => PathBuf::from(env.default_output_directory()?),
        };
        Ok(Options {
            temp_directory,
            punic_directory: self.punic_directory,
            output_directory,
        })
    }
}

fn existing_directory(
    option: OptionName,
    raw: &OsStr,
    normalized: Option<String>,
) -> Result<PathBuf, OptionsError> {
    match normalized.map(PathBuf::from) {
        Some(path) if path.is_dir() => Ok(path),
        _ => Err(OptionsError::DirectoryNotFound {
            option,
            value: raw.to_string_lossy().into_owned(),
        }),
    }
}

/// Splits `--name=value` at the first `=`. Short options and tokens that
/// are not valid Unicode never split.
fn split_inline(token: &OsStr) -> Option<(&str, &str)> {
    let (key, value) = token.to_str()?.split_once('=')?;
    (key.len() > 2 && key.starts_with("--")).then_some((key, value))
}

/// Usage text, with the defaults rendered using native separators. A
/// default the environment cannot provide is shown empty.
pub fn help_text(env: &Environment) -> String {
    let platform = Platform::current();
    let native = |default: Result<String, OptionsError>| {
        default
            .map(|path| platform.to_native(&path))
            .unwrap_or_default()
    };
    let temp = native(env.default_temp_directory());
    let output = native(env.default_output_directory());
    format!(
        "Available options:

  --help|-h
    Show this help message

  --temp=<path>|-t <path>
    The path of a temporary directory (default: {temp})

  --punic=<path>|-p <path>
    The path of Punic.
    If not specified, we'll fetch the last version of Punic from GitHub.

  --output=<path>|-o <path>
    The path of the generated docs directory (default: {output}).
    WARNING! This directory will be emptied!!!
"
    )
}
