//! Process-wide `tracing` subscriber setup.

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::EnvConfig;

pub const DEFAULT_LOG_FILTER: &str = "info";

/// Filter directives from `ONEGRAPH_LOG`, falling back to [`DEFAULT_LOG_FILTER`]
/// when unset or unparsable.
pub fn env_filter(config: &EnvConfig) -> EnvFilter {
    config
        .log_filter
        .as_deref()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install the global fmt subscriber, writing to `ONEGRAPH_LOG_FILE` when set
/// and to stderr otherwise.
///
/// Returns `Ok(false)` when a global subscriber was already installed.
pub fn init_logging(config: &EnvConfig) -> io::Result<bool> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_target(false);

    let installed = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(io::stderr).try_init(),
    };
    Ok(installed.is_ok())
}
