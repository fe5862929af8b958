//! Logging initialisation.
//!
//! The reader draws on the terminal, so log lines must not reach stderr while
//! the TUI is up: they go to a file, or nowhere. Non-interactive commands log
//! to stderr. `FOLIO_LOG` overrides the verbosity-derived filter.

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a filter directive that overrides `-v`.
pub const LOG_ENV: &str = "FOLIO_LOG";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Where log output goes.
pub enum LogTarget {
    /// No subscriber is installed.
    #[default]
    Disabled,
    /// Standard error, for commands that do not take over the terminal.
    Stderr,
    /// Appended to a file.
    File(PathBuf),
}

/// Maps a verbosity level to a tracing directive string.
///
/// - 0 → `"warn"`
/// - 1 → `"info"`
/// - 2 → `"debug"`
/// - 3+ → `"trace"`
#[must_use]
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the global tracing subscriber.
///
/// Uses `try_init()` so calling this more than once is harmless.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init_logging(target: &LogTarget, verbosity: u8) -> io::Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity)));

    match target {
        LogTarget::Disabled => {}
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(verbosity >= 2)
                .with_writer(io::stderr)
                .try_init();
        }
        LogTarget::File(path) => {
            let file = File::options().create(true).append(true).open(path)?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init();
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/logging.rs"]
mod tests;
