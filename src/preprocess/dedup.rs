//! Exact-duplicate row removal.

use arrow::array::BooleanArray;
use arrow::record_batch::RecordBatch;
use arrow::row::{RowConverter, SortField};
use rustc_hash::FxHashSet;

use crate::error::Result;
use crate::filter::filter_record_batch;

/// Drop rows equal in every column to an earlier row. Nulls compare equal
/// to nulls. The first occurrence is kept and row order is preserved.
pub fn drop_duplicates(batch: &RecordBatch) -> Result<RecordBatch> {
    if batch.num_rows() < 2 {
        return Ok(batch.clone());
    }

    let fields = batch
        .schema()
        .fields()
        .iter()
        .map(|f| SortField::new(f.data_type().clone()))
        .collect();
    let converter = RowConverter::new(fields)?;
    let rows = converter.convert_columns(batch.columns())?;

    let mut seen = FxHashSet::default();
    let mask: BooleanArray = rows.iter().map(|row| Some(seen.insert(row))).collect();

    let deduplicated = filter_record_batch(batch, &mask)?;
    let removed = batch.num_rows() - deduplicated.num_rows();
    if removed > 0 {
        log::info!("Dropped {removed} duplicate row(s)");
    }
    Ok(deduplicated)
}
