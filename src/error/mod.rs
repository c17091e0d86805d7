//! Error handling for the segment analysis.

pub mod util;

use std::io;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

/// Specialized error type for loading, preprocessing and reporting
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The working dataset is missing or has no rows
    #[error("Empty input: dataset is empty or has not been loaded")]
    EmptyInput,

    /// None of the requested registration status codes is allowed
    #[error("Invalid status code(s) {requested:?}: use only 2, 3, 4 or 8")]
    InvalidStatus { requested: Vec<i64> },

    /// Positional renaming with a name list of the wrong length
    #[error("Schema mismatch: table has {actual} columns but {expected} names were supplied")]
    SchemaMismatch { expected: usize, actual: usize },

    /// A required column is absent
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// A column does not have the expected Arrow type
    #[error("Column '{column}' is not a {expected} array")]
    InvalidDataType { column: String, expected: String },

    /// Integer normalization failed for a column
    #[error("Cannot convert column '{column}' to integers: {source}")]
    Cast {
        column: String,
        #[source]
        source: ArrowError,
    },

    /// A reference table could not be interpreted
    #[error("Reference table {table}: {message}")]
    ReferenceTable { table: String, message: String },

    /// Error opening, creating or writing a file
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    /// Error processing Parquet data
    #[error("Parquet error: {0}")]
    ParquetError(#[from] ParquetError),

    /// Error from an Arrow kernel or the CSV writer
    #[error("Arrow error: {0}")]
    ArrowError(#[from] ArrowError),

    /// Error reading a delimited reference table
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl AnalysisError {
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound(column.into())
    }

    pub fn invalid_data_type(column: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::InvalidDataType {
            column: column.into(),
            expected: expected.into(),
        }
    }

    pub fn reference_table(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ReferenceTable {
            table: table.into(),
            message: message.into(),
        }
    }
}

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;
