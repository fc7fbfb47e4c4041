// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pipeline error types.
//!
//! Every failure the import pipeline can surface is one of these variants so
//! the caller (the login flow in the desktop app) can tell "skip this row"
//! apart from "this export is unusable".

use chrono::NaiveDate;

/// Pipeline error type.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Failed to parse export document: {0}")]
    Parse(String),

    #[error("Invalid export timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Cannot convert {field} value {value:?}")]
    Conversion { field: &'static str, value: String },

    #[error("Cleaned CSV error: {0}")]
    Csv(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Insert of run dated {date} failed after {inserted} rows: {message}")]
    Insert {
        date: NaiveDate,
        inserted: usize,
        message: String,
    },
}

impl PipelineError {
    /// True when only a single row is affected and the caller may drop it
    /// and carry on with the rest of the export.
    pub fn is_row_error(&self) -> bool {
        matches!(self, PipelineError::Conversion { .. })
    }

    /// True when the export document itself could not be read.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            PipelineError::Parse(_) | PipelineError::InvalidTimestamp(_)
        )
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::Io(err.to_string())
    }
}

impl From<csv::Error> for PipelineError {
    fn from(err: csv::Error) -> Self {
        PipelineError::Csv(err.to_string())
    }
}

impl From<sqlx::Error> for PipelineError {
    fn from(err: sqlx::Error) -> Self {
        PipelineError::Database(err.to_string())
    }
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
