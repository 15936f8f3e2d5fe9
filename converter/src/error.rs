//! Error types for the menu conversion pipeline.
//!
//! This module defines one error type per stage:
//!
//! - [`CsvError`] - reading and decoding delimited text
//! - [`ConfigError`] - lookup tables and run options
//! - [`NormalizeError`] - value coercion during normalization
//! - [`WriteError`] - serializing the output table
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across stage boundaries.

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// CSV Reading Errors
// =============================================================================

/// Errors while reading a delimited text file.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV content.
    #[error("Invalid CSV at line {line}: {message}")]
    Parse { line: u64, message: String },

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,

    /// No headers found.
    #[error("No headers found in CSV")]
    NoHeaders,
}

impl From<csv::Error> for CsvError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        CsvError::Parse {
            line,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors loading lookup tables or resolving run options.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Tables file could not be read.
    #[error("Failed to read tables file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tables file is not valid JSON for the expected shape.
    #[error("Invalid tables file: {0}")]
    Json(#[from] serde_json::Error),

    /// A required path was neither given nor entered at the prompt.
    #[error("Missing {0} path")]
    MissingPath(&'static str),

    /// Delimiter must be a single ASCII character.
    #[error("Delimiter must be a single ASCII character, got '{0}'")]
    InvalidDelimiter(char),
}

// =============================================================================
// Normalization Errors
// =============================================================================

/// Errors coercing cell values during normalization.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// A value that must be numeric is not.
    #[error("Row {row}, column '{column}': '{value}' is not a number")]
    NotANumber {
        row: usize,
        column: String,
        value: String,
    },

    /// Price arithmetic left the representable decimal range.
    #[error("Row {row}: price '{price}' at rate '{rate}' is out of range")]
    PriceOverflow {
        row: usize,
        price: String,
        rate: String,
    },
}

// =============================================================================
// Writer Errors
// =============================================================================

/// Errors writing the output table.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to create or flush the output file.
    #[error("Failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV serialization failure.
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    /// Run report serialization failure.
    #[error("JSON write error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the error type returned by [`crate::transform::pipeline::convert_file`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// CSV reading error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Normalization error.
    #[error("Normalize error: {0}")]
    Normalize(#[from] NormalizeError),

    /// Writer error.
    #[error("Write error: {0}")]
    Write(#[from] WriteError),

    /// Template has no columns to write.
    #[error("Template '{0}' defines no columns")]
    EmptyTemplate(PathBuf),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV reading.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for normalization.
pub type NormalizeResult<T> = Result<T, NormalizeError>;

/// Result type for the writer.
pub type WriteResult<T> = Result<T, WriteError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let csv_err = CsvError::EmptyFile;
        let pipeline_err: PipelineError = csv_err.into();
        assert!(pipeline_err.to_string().contains("empty"));

        let norm_err = NormalizeError::NotANumber {
            row: 3,
            column: "OriginalPrice*".into(),
            value: "abc".into(),
        };
        let pipeline_err: PipelineError = norm_err.into();
        assert!(pipeline_err.to_string().contains("OriginalPrice*"));
    }

    #[test]
    fn test_not_a_number_format() {
        let err = NormalizeError::NotANumber {
            row: 7,
            column: "vatRate".into(),
            value: "VatUnknown".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Row 7"));
        assert!(msg.contains("'VatUnknown'"));
    }
}
