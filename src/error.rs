//! Error types for datalens operations.
//!
//! Every failure that concerns a single column or column pair is a distinct,
//! named variant carrying the offending column name(s), so a front end can
//! report exactly what went wrong:
//!
//! ```
//! use datalens::error::AnalysisError;
//!
//! fn describe(err: &AnalysisError) -> String {
//!     match err {
//!         AnalysisError::ColumnNotFound { name } => format!("no column called {name}"),
//!         AnalysisError::NotNumeric { column } => format!("{column} holds text"),
//!         other => other.to_string(),
//!     }
//! }
//! # assert_eq!(describe(&AnalysisError::NotNumeric { column: "Dept".to_owned() }), "Dept holds text");
//! ```
//!
//! Aggregate operations never raise these per-item errors; they record an
//! [`UndefinedReason`] for the affected entry instead.

use crate::analyser::logic::types::UndefinedReason;
use std::fmt;

/// Main error type for datalens operations.
#[derive(Debug)]
pub enum AnalysisError {
    /// The requested column does not exist in the table.
    ColumnNotFound { name: String },

    /// The operation needs a numeric column but the column is categorical.
    NotNumeric { column: String },

    /// No values remain after excluding missing cells.
    EmptyColumn { column: String },

    /// A correlation pair lacks joint data or one side has zero variance.
    InsufficientData {
        left: String,
        right: String,
        reason: UndefinedReason,
    },

    /// Errors raised by the tabular engine (parsing, casting, etc.)
    DataProcessing(String),

    /// Invalid configuration values or configuration files.
    Config(String),

    /// I/O errors while reading datasets or configuration.
    Io(std::io::Error),

    /// Generic error with context
    Other(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnNotFound { name } => write!(f, "Column not found: '{name}'"),
            Self::NotNumeric { column } => write!(f, "Column '{column}' is not numeric"),
            Self::EmptyColumn { column } => {
                write!(f, "Column '{column}' has no non-missing values")
            }
            Self::InsufficientData {
                left,
                right,
                reason,
            } => write!(
                f,
                "Insufficient data to correlate '{left}' and '{right}': {reason}"
            ),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl AnalysisError {
    /// Short name of the error kind, as shown by the command-line front end.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ColumnNotFound { .. } => "ColumnNotFoundError",
            Self::NotNumeric { .. } => "NotNumericError",
            Self::EmptyColumn { .. } => "EmptyColumnError",
            Self::InsufficientData { .. } => "InsufficientDataError",
            Self::DataProcessing(_) => "DataProcessingError",
            Self::Config(_) => "ConfigError",
            Self::Io(_) => "IoError",
            Self::Other(_) => "Error",
        }
    }
}

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<polars::error::PolarsError> for AnalysisError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

/// Result type alias for datalens operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<AnalysisError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: AnalysisError = e.into();
            AnalysisError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: AnalysisError = e.into();
            AnalysisError::Other(format!("{}: {}", f(), err))
        })
    }
}
