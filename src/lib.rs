//! Segment reports over CNPJ establishment registrations.
//!
//! Loads the establishment table from Parquet, enriches it with the
//! municipality, classification and status-reason reference tables, and
//! writes aggregate CSV reports for a target set of classification codes.

pub mod analysis;
pub mod config;
pub mod error;
pub mod filter;
pub mod preprocess;
pub mod schema;
pub mod utils;

// Re-export the most common types for easier use
pub use analysis::EstablishmentAnalysis;
pub use config::{AnalysisConfig, ReferenceTableConfig, TextEncoding};
pub use error::{AnalysisError, Result};
pub use filter::{StatusSelection, filter_segment};
pub use preprocess::{ReferenceTable, ReferenceTables, preprocess};
pub use schema::ESTABLISHMENT_COLUMNS;

// Arrow types
pub use arrow::record_batch::RecordBatch;
