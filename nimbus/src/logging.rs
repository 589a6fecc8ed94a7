//! Derivation of the log level from command line options and configuration.

use log::Level;

use crate::Error;

/// The verbosity level when neither `--verbose` nor `--quiet` is given.
pub const DEFAULT_VERBOSE_LEVEL: u64 = 1;

/// Maps a verbosity level onto a log level.
///
/// `0` (quiet) only shows errors, the default shows warnings, and each
/// additional `-v` gets chattier.
pub fn log_level_from_verbosity(verbose_level: u64) -> Level {
    match verbose_level {
        0 => Level::Error,
        1 => Level::Warn,
        2 => Level::Info,
        _ => Level::Debug,
    }
}

/// Parses a log level name as it appears in configuration files.
pub fn log_level_from_name(name: &str) -> Result<Level, Error> {
    Ok(match name.trim().to_lowercase().as_ref() {
        "trace" => Level::Trace,
        "debug" => Level::Debug,
        "info" => Level::Info,
        "warn" | "warning" => Level::Warn,
        "error" | "critical" => Level::Error,
        _ => return Err(Error::UnknownLogLevel(name.to_string())),
    })
}

/// Works out the effective log level.
///
/// `--debug` always wins. A log level from the configuration only applies when
/// the verbosity wasn't changed on the command line.
pub fn log_level(verbose_level: u64, debug: bool, configured: Option<&str>) -> Result<Level, Error> {
    if debug {
        return Ok(Level::Debug);
    }
    match configured {
        Some(name) if verbose_level == DEFAULT_VERBOSE_LEVEL => log_level_from_name(name),
        _ => Ok(log_level_from_verbosity(verbose_level)),
    }
}
