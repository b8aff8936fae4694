//! Error types for the persistence and configuration boundary
//!
//! The per-tick simulation never fails; these only surface when reading or
//! writing level files, coin maps and settings.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised outside the simulation step
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Level format error on line {line}: {message}")]
    LevelFormat { line: usize, message: String },

    #[error("Coin map error on line {line}: {message}")]
    CoinMap { line: usize, message: String },

    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn level_format(line: usize, message: impl Into<String>) -> Self {
        Error::LevelFormat {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn coin_map(line: usize, message: impl Into<String>) -> Self {
        Error::CoinMap {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
