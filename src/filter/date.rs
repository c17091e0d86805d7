//! Date range filtering over `Date32` columns.

use std::collections::HashSet;

use arrow::array::{Array, BooleanArray, Date32Array};
use arrow::datatypes::Date32Type;
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;

use crate::error::{AnalysisError, Result};
use crate::filter::core::{BatchFilter, filter_record_batch};
use crate::schema::column_index;

/// A filter that includes only rows with dates in a specified range.
/// Rows with a null date are always excluded.
#[derive(Debug, Clone)]
pub struct DateRangeFilter {
    /// The name of the date column
    date_column: String,

    /// The start date (inclusive)
    start_date: Option<NaiveDate>,

    /// The end date (inclusive)
    end_date: Option<NaiveDate>,
}

impl DateRangeFilter {
    /// Create a new date range filter
    ///
    /// # Arguments
    /// * `date_column` - The name of the date column
    /// * `start_date` - Optional start date (inclusive)
    /// * `end_date` - Optional end date (inclusive)
    #[must_use]
    pub fn new(
        date_column: impl Into<String>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            date_column: date_column.into(),
            start_date,
            end_date,
        }
    }
}

impl BatchFilter for DateRangeFilter {
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        let idx = column_index(batch, &self.date_column)?;
        let dates = batch
            .column(idx)
            .as_any()
            .downcast_ref::<Date32Array>()
            .ok_or_else(|| AnalysisError::invalid_data_type(&self.date_column, "Date32Array"))?;

        let start = self.start_date.map(Date32Type::from_naive_date);
        let end = self.end_date.map(Date32Type::from_naive_date);

        let mask: BooleanArray = dates
            .iter()
            .map(|day| {
                Some(day.is_some_and(|d| {
                    start.is_none_or(|s| d >= s) && end.is_none_or(|e| d <= e)
                }))
            })
            .collect();

        filter_record_batch(batch, &mask)
    }

    fn required_columns(&self) -> HashSet<String> {
        HashSet::from([self.date_column.clone()])
    }
}

/// Latest non-null date of a `Date32` column
pub fn max_date(batch: &RecordBatch, column: &str) -> Result<Option<NaiveDate>> {
    let idx = column_index(batch, column)?;
    let dates = batch
        .column(idx)
        .as_any()
        .downcast_ref::<Date32Array>()
        .ok_or_else(|| AnalysisError::invalid_data_type(column, "Date32Array"))?;

    Ok(arrow::compute::max(dates).map(Date32Type::to_naive_date))
}
