use std::env;
use std::io;

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Level used when `RUST_LOG` is not provided.
const DEFAULT_LOG_LEVEL: &str = "warn";

/// Selects JSON output when set to `json`.
const LOG_FORMAT_VAR: &str = "PUNIC_SITE_LOG_FORMAT";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LogFormat {
    Json,
    Text,
}

impl LogFormat {
    pub(crate) fn from_env() -> Self {
        Self::parse(env::var(LOG_FORMAT_VAR).ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value {
            Some(value) if value.trim().eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Installs the global subscriber. Logs go to stderr so stdout stays clean.
pub(crate) fn init_logging(format: LogFormat) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let builder = fmt::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false);

    let installed = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    installed.map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}
