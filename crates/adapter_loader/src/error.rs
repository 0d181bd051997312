//! Loader error types.

use std::path::PathBuf;
use thiserror::Error;
use vol_core::types::{DateError, SeriesError};

/// Failure to load provider data.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// File could not be opened or read.
    #[error("Failed to read '{path}': {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required column is absent from the header.
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    /// A row has no value in a column other rows populate.
    #[error("line {line}: missing value for column '{column}'")]
    MissingValue {
        /// 1-based line number including the header
        line: usize,
        /// Column name
        column: &'static str,
    },

    /// A date cell failed to parse.
    #[error("line {line}: {source}")]
    InvalidDate {
        /// 1-based line number including the header
        line: usize,
        /// Parse failure
        #[source]
        source: DateError,
    },

    /// An options-chain contract could not be interpreted.
    #[error("contract {index}: {message}")]
    InvalidContract {
        /// Position in the provider's contract list
        index: usize,
        /// What was wrong
        message: String,
    },

    /// The same date appears on two rows.
    #[error("duplicate date {0}")]
    DuplicateDate(String),

    /// Loaded data violates a series invariant.
    #[error("Invalid price series: {0}")]
    Series(#[from] SeriesError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            LoaderError::MissingColumn("close").to_string(),
            "missing required column 'close'"
        );
        assert_eq!(
            LoaderError::MissingValue {
                line: 4,
                column: "open"
            }
            .to_string(),
            "line 4: missing value for column 'open'"
        );
    }

    #[test]
    fn test_io_error_names_path() {
        let err = LoaderError::Io {
            path: PathBuf::from("/tmp/prices.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("/tmp/prices.csv"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
