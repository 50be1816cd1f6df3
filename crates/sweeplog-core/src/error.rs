//! Error types for sweep log extraction

use std::num::{ParseFloatError, ParseIntError};

/// Extraction / serialization errors
#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    /// Block delimiter must contain at least one character
    #[error("block delimiter must not be empty")]
    EmptyDelimiter,

    /// Captured integer field could not be converted
    #[error("failed to parse {field}: {raw}")]
    InvalidInteger {
        field: &'static str,
        raw: String,
        #[source]
        source: ParseIntError,
    },

    /// Captured decimal field could not be converted
    #[error("failed to parse {field}: {raw}")]
    InvalidFloat {
        field: &'static str,
        raw: String,
        #[source]
        source: ParseFloatError,
    },

    /// CSV writer error
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// File I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for extraction operations
pub type ExtractResult<T> = Result<T, ExtractError>;
