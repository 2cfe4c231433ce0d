use std::env;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use punic_site_config::{Environment, Options, OptionsError, ParseOutcome};
use punic_site_utils::{delete_recursive, ensure_directory, DeleteMode, FsError, ScratchDirectory};
use tracing::info;

mod logging;

/// Process exit statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    Failure = 1,
    InvalidArguments = 2,
    Filesystem = 3,
}

/// Maps an error escaping [`run`] to the status the process exits with.
pub fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    if err.downcast_ref::<OptionsError>().is_some() {
        ExitCode::InvalidArguments
    } else if err.downcast_ref::<FsError>().is_some() {
        ExitCode::Filesystem
    } else {
        ExitCode::Failure
    }
}

/// Entry point for CLI execution. Returns the desired exit code.
pub fn run() -> Result<i32> {
    logging::init_logging(logging::LogFormat::from_env())?;
    let environment = Environment::detect()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with(env::args_os().skip(1), &environment, &mut out)
}

/// Parses `args` against `environment` and prepares the directories of a
/// site build, reporting to `out`.
pub fn run_with<I, T, W>(args: I, environment: &Environment, out: &mut W) -> Result<i32>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
    W: Write,
{
    let options = match Options::parse_from(args, environment)? {
        ParseOutcome::Help(text) => {
            write!(out, "{text}")?;
            out.flush()?;
            return Ok(ExitCode::Success as i32);
        }
        ParseOutcome::Run(options) => options,
    };

    let scratch = ScratchDirectory::new(options.temp_directory())?;
    prepare_output_directory(options.output_directory())?;

    writeln!(out, "Working directory: {}", scratch.path().display())?;
    match options.punic_directory() {
        Some(path) => writeln!(out, "Punic: {}", path.display())?,
        None => writeln!(out, "Punic: latest version from GitHub")?,
    }
    writeln!(out, "Output directory: {}", options.output_directory().display())?;
    out.flush()?;

    scratch.release();
    Ok(ExitCode::Success as i32)
}

/// Empties `path` (creating it when missing) so the new site starts clean.
fn prepare_output_directory(path: &Path) -> Result<(), FsError> {
    delete_recursive(path, DeleteMode::ContentsOnly)?;
    ensure_directory(path)?;
    info!(path = %path.display(), "output directory ready");
    Ok(())
}
