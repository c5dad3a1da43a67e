//! Crate-level error type for the simulator host.

use std::fmt;
use std::io;

use thiserror::Error;

use crate::config::ConfigError;

/// Result alias for host operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to the binary.
///
/// The monitor core never fails at runtime; these cover loading the
/// scenario and writing telemetry.
#[derive(Debug, Error)]
pub enum Error {
    /// The scenario failed to load or validate.
    #[error("{}", ConfigErrors(.0))]
    Config(Vec<ConfigError>),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(vec![err])
    }
}

/// Renders one config error per line.
struct ConfigErrors<'a>(&'a [ConfigError]);

impl fmt::Display for ConfigErrors<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}
