//! Error types shared by the orrery host.

use thiserror::Error;

/// Main error type for the host side of the orrery.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation errors
    #[error("Config error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using the orrery's Error type.
pub type Result<T> = std::result::Result<T, Error>;
