//! Core filtering functionality for record batches
//!
//! Defines the `BatchFilter` trait, the mask-based filter function every
//! filter ends in, and the integer code-set filter used for segments.

use std::collections::HashSet;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanArray, Int64Array};
use arrow::compute::filter as arrow_filter;
use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashSet;

use crate::error::{AnalysisError, Result};
use crate::schema::column_index;

/// Filter a record batch based on a boolean mask
///
/// # Arguments
/// * `batch` - The record batch to filter
/// * `mask` - The boolean mask indicating which rows to keep
pub fn filter_record_batch(batch: &RecordBatch, mask: &BooleanArray) -> Result<RecordBatch> {
    if batch.num_rows() != mask.len() {
        return Err(arrow::error::ArrowError::InvalidArgumentError(format!(
            "Mask length ({}) doesn't match batch row count ({})",
            mask.len(),
            batch.num_rows()
        ))
        .into());
    }

    let filtered_columns: Vec<ArrayRef> = batch
        .columns()
        .iter()
        .map(|col| arrow_filter(col, mask))
        .collect::<arrow::error::Result<_>>()?;

    Ok(RecordBatch::try_new(batch.schema(), filtered_columns)?)
}

/// Trait for objects that can filter record batches
pub trait BatchFilter: std::fmt::Debug {
    /// Filter a record batch, returning a new batch with the kept rows
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch>;

    /// Returns the set of column names required by this filter
    fn required_columns(&self) -> HashSet<String>;
}

/// A filter that combines multiple filters with a logical AND
#[derive(Debug, Clone)]
pub struct AndFilter {
    filters: Vec<Arc<dyn BatchFilter + Send + Sync>>,
}

impl AndFilter {
    /// Create a new AND filter
    #[must_use]
    pub fn new(filters: Vec<Arc<dyn BatchFilter + Send + Sync>>) -> Self {
        Self { filters }
    }
}

impl BatchFilter for AndFilter {
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        let mut result_batch = batch.clone();

        for filter in &self.filters {
            if result_batch.num_rows() == 0 {
                return Ok(result_batch);
            }
            result_batch = filter.filter(&result_batch)?;
        }

        Ok(result_batch)
    }

    fn required_columns(&self) -> HashSet<String> {
        let mut columns = HashSet::new();
        for filter in &self.filters {
            columns.extend(filter.required_columns());
        }
        columns
    }
}

/// Keeps rows whose `Int64` column value belongs to a set of codes.
/// Null values never match.
#[derive(Debug, Clone)]
pub struct CodeSetFilter {
    column: String,
    codes: FxHashSet<i64>,
}

impl CodeSetFilter {
    #[must_use]
    pub fn new(column: impl Into<String>, codes: impl IntoIterator<Item = i64>) -> Self {
        Self {
            column: column.into(),
            codes: codes.into_iter().collect(),
        }
    }

    /// Boolean mask where true means the value is in the code set
    pub fn create_mask(&self, batch: &RecordBatch) -> Result<BooleanArray> {
        let idx = column_index(batch, &self.column)?;
        let values = batch
            .column(idx)
            .as_any()
            .downcast_ref::<Int64Array>()
            .ok_or_else(|| AnalysisError::invalid_data_type(&self.column, "Int64Array"))?;

        Ok(values
            .iter()
            .map(|v| Some(v.is_some_and(|code| self.codes.contains(&code))))
            .collect())
    }
}

impl BatchFilter for CodeSetFilter {
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        let mask = self.create_mask(batch)?;
        filter_record_batch(batch, &mask)
    }

    fn required_columns(&self) -> HashSet<String> {
        HashSet::from([self.column.clone()])
    }
}
