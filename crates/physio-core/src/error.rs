//! Error types for the physio-track workspace.
//!
//! Per-frame scoring and session aggregation never fail; these errors only
//! surface at the edges (label parsing, configuration, report I/O).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Exercise not recognized: {0:?}")]
    UnknownExercise(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Error::Config(e.to_string())
    }
}
