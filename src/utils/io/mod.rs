//! IO utilities for file operations
//!
//! Parquet input, delimited reference tables and CSV report output.

pub mod csv;
pub mod parquet;

// Re-export commonly used functions for convenience
pub use self::csv::{read_reference_rows, write_csv};
pub use self::parquet::{read_parquet, read_parquet_table};
