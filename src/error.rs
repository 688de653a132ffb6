//! Error types for the textsense library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`TextsenseError`] enum. Errors are never retried inside the library; they
//! propagate to the caller, and the binary reports them and exits with a
//! non-zero status.
//!
//! # Examples
//!
//! ```
//! use textsense::error::{Result, TextsenseError};
//!
//! fn check_fraction(fraction: f64) -> Result<()> {
//!     if !(0.0..=1.0).contains(&fraction) {
//!         return Err(TextsenseError::invalid_argument("fraction out of range"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_fraction(0.2).is_ok());
//! assert!(check_fraction(1.5).is_err());
//! ```

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The main error type for textsense operations.
#[derive(Error, Debug)]
pub enum TextsenseError {
    /// I/O errors not tied to a specific input file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input file is missing or cannot be read
    #[error("Cannot access '{}': {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A record does not match the expected two-column layout
    #[error("Format error at line {line}: {message}")]
    Format { line: usize, message: String },

    /// Records are missing data a stage requires (e.g. labels)
    #[error("Schema error: {0}")]
    Schema(String),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Model fitting failed
    #[error("Training error: {0}")]
    Training(String),

    /// Metrics could not be computed
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with TextsenseError.
pub type Result<T> = std::result::Result<T, TextsenseError>;

impl TextsenseError {
    /// Create a new file access error.
    pub fn file_access<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        TextsenseError::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// Create a new format error for a 1-based line number.
    pub fn format<S: Into<String>>(line: usize, msg: S) -> Self {
        TextsenseError::Format {
            line,
            message: msg.into(),
        }
    }

    /// Create a new schema error.
    pub fn schema<S: Into<String>>(msg: S) -> Self {
        TextsenseError::Schema(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        TextsenseError::Analysis(msg.into())
    }

    /// Create a new training error.
    pub fn training<S: Into<String>>(msg: S) -> Self {
        TextsenseError::Training(msg.into())
    }

    /// Create a new evaluation error.
    pub fn evaluation<S: Into<String>>(msg: S) -> Self {
        TextsenseError::Evaluation(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        TextsenseError::InvalidArgument(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        TextsenseError::Config(msg.into())
    }
}
