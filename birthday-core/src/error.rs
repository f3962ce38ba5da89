//! Error types for birthday calendar conversion.

use thiserror::Error;

/// Errors that can occur while converting a birthday calendar.
#[derive(Error, Debug)]
pub enum BirthdayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("Event '{summary}' has no usable {property}")]
    MissingProperty {
        summary: String,
        property: &'static str,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for birthday conversion operations.
pub type BirthdayResult<T> = Result<T, BirthdayError>;
