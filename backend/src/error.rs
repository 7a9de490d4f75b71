//! Error types for the co2watch analytics pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`LoadError`] - Data source errors (upload missing, remote fetch failed)
//! - [`ParseError`] - Spreadsheet parsing errors
//! - [`ChartError`] - SVG chart rendering errors
//! - [`PipelineError`] - Top-level orchestration errors
//! - [`ServerError`] - HTTP server errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! Every pipeline error aborts the whole run before any artifact is
//! produced; partial dashboards are never emitted.

use thiserror::Error;

// =============================================================================
// Data Source Errors
// =============================================================================

/// Errors from a data source (`DataSource::load`).
#[derive(Debug, Error)]
pub enum LoadError {
    /// No spreadsheet has been provided yet.
    ///
    /// This is the expected "waiting for the user" state of the upload
    /// variant, not a failure. Callers should render an idle state and
    /// attempt no computation.
    #[error("No input provided yet")]
    NoInput,

    /// Remote fetch or payload decode failed. Fatal for this run.
    #[error("Failed to fetch spreadsheet: {0}")]
    FetchFailed(String),

    /// Failed to read a local file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),
}

// =============================================================================
// Spreadsheet Parsing Errors
// =============================================================================

/// Errors while turning raw spreadsheet bytes into a wide table.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Required `Timestamp` column is absent.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A timestamp cell could not be parsed.
    ///
    /// One bad cell fails the entire run; row identity is carried so the
    /// user can fix the source file.
    #[error("Unparseable timestamp at row {row}: '{value}'")]
    BadTimestamp { row: usize, value: String },

    /// A non-blank reading cell is not numeric.
    #[error("Non-numeric reading at row {row}, column '{column}': '{value}'")]
    BadNumber {
        row: usize,
        column: String,
        value: String,
    },

    /// Header-only or zero-byte input.
    #[error("Spreadsheet contains no data rows")]
    EmptySheet,

    /// XLSX workbook could not be opened or has no sheets.
    #[error("Invalid workbook: {0}")]
    BadWorkbook(String),

    /// Delimited text could not be read.
    #[error("Invalid delimited text: {0}")]
    BadCsv(#[from] csv::Error),
}

// =============================================================================
// Chart Rendering Errors
// =============================================================================

/// Errors while rendering artifacts to SVG.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The plotters backend failed to draw.
    #[error("Failed to draw chart '{chart}': {message}")]
    Draw {
        chart: &'static str,
        message: String,
    },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level orchestration errors.
///
/// This is the main error type returned by
/// [`crate::pipeline::run_from_source`]. It wraps all lower-level errors
/// and adds pipeline-specific variants.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Data source error.
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Spreadsheet parsing error.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Chart rendering error.
    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for data source operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for chart rendering.
pub type ChartResult<T> = Result<T, ChartError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // ParseError -> PipelineError
        let parse_err = ParseError::MissingColumn("Timestamp".into());
        let pipeline_err: PipelineError = parse_err.into();
        assert!(pipeline_err.to_string().contains("Timestamp"));

        // LoadError -> PipelineError
        let load_err = LoadError::FetchFailed("connection refused".into());
        let pipeline_err: PipelineError = load_err.into();
        assert!(pipeline_err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_bad_timestamp_carries_row_identity() {
        let err = ParseError::BadTimestamp {
            row: 17,
            value: "not-a-date".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("row 17"));
        assert!(msg.contains("not-a-date"));
    }

    #[test]
    fn test_no_input_is_distinct_from_fetch_failure() {
        let idle = LoadError::NoInput;
        let failed = LoadError::FetchFailed("timeout".into());
        assert!(idle.to_string().contains("No input"));
        assert!(failed.to_string().contains("timeout"));
    }
}
