//! Error types for the subgloss library.
//!
//! All errors are represented by the [`SubglossError`] enum. Dictionary
//! lookups never produce errors; an empty lookup result is a normal outcome.
//!
//! # Examples
//!
//! ```
//! use subgloss::error::{SubglossError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(SubglossError::configuration("highlight color list is empty"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for subgloss operations.
#[derive(Error, Debug)]
pub enum SubglossError {
    /// I/O errors (reading subtitles, dictionaries, spawning the analyzer)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid annotation settings, surfaced before any caption is processed
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The external morphological analyzer failed on a caption
    #[error("Tokenization error: {0}")]
    Tokenization(String),

    /// A dictionary file could not be parsed
    #[error("Dictionary error: {0}")]
    Dictionary(String),

    /// A subtitle file could not be parsed
    #[error("Subtitle error: {0}")]
    Subtitle(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with SubglossError.
pub type Result<T> = std::result::Result<T, SubglossError>;

impl SubglossError {
    /// Create a new configuration error.
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        SubglossError::Configuration(msg.into())
    }

    /// Create a new tokenization error.
    pub fn tokenization<S: Into<String>>(msg: S) -> Self {
        SubglossError::Tokenization(msg.into())
    }

    /// Create a new dictionary error.
    pub fn dictionary<S: Into<String>>(msg: S) -> Self {
        SubglossError::Dictionary(msg.into())
    }

    /// Create a new subtitle error.
    pub fn subtitle<S: Into<String>>(msg: S) -> Self {
        SubglossError::Subtitle(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SubglossError::Other(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        SubglossError::Other(format!("Invalid argument: {}", msg.into()))
    }
}
