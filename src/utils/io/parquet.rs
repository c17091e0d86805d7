//! Parquet file operations
//!
//! Reads the establishment table into a single Arrow record batch.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use arrow::array::ArrayRef;
use arrow::compute::{cast, concat_batches};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::Result;
use crate::error::util::safe_open_file;
use crate::utils::logging::{log_read_start, log_table_loaded, log_warning};

const ESTABLISHMENT_TABLE: &str = "establishment table";

/// Read a parquet file into Arrow record batches
///
/// # Arguments
/// * `path` - Path to the Parquet file
/// * `batch_size` - Rows per decoded batch
pub fn read_parquet(path: &Path, batch_size: usize) -> Result<Vec<RecordBatch>> {
    let start = Instant::now();
    log_read_start(ESTABLISHMENT_TABLE, path);

    let file = safe_open_file(path, ESTABLISHMENT_TABLE)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?
        .with_batch_size(batch_size)
        .build()?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;

    log_table_loaded(
        ESTABLISHMENT_TABLE,
        path,
        batches.iter().map(RecordBatch::num_rows).sum(),
        start.elapsed(),
    );
    Ok(batches)
}

/// Schema with every `Utf8` field widened to `LargeUtf8`
fn widened_schema(schema: &Schema) -> SchemaRef {
    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .map(|f| match f.data_type() {
            DataType::Utf8 => f.as_ref().clone().with_data_type(DataType::LargeUtf8),
            _ => f.as_ref().clone(),
        })
        .collect();
    Arc::new(Schema::new_with_metadata(fields, schema.metadata().clone()))
}

/// Cast a batch to `schema`, which differs from its own only in string widths
fn widen_batch(batch: &RecordBatch, schema: &SchemaRef) -> Result<RecordBatch> {
    let columns = batch
        .columns()
        .iter()
        .zip(schema.fields())
        .map(|(column, field)| {
            if column.data_type() == field.data_type() {
                Ok(column.clone())
            } else {
                cast(column, field.data_type())
            }
        })
        .collect::<arrow::error::Result<Vec<ArrayRef>>>()?;

    Ok(RecordBatch::try_new(schema.clone(), columns)?)
}

/// Read a parquet file and concatenate all of its batches into one table.
///
/// String columns come back as `LargeUtf8`: a column of the full registry
/// dump can hold more than the 2 GiB that `Utf8` offsets address.
pub fn read_parquet_table(path: &Path, batch_size: usize) -> Result<RecordBatch> {
    let batches = read_parquet(path, batch_size)?;

    let Some(first) = batches.first() else {
        log_warning("Parquet file contains no rows", Some(path));
        let file = safe_open_file(path, ESTABLISHMENT_TABLE)?;
        let schema = ParquetRecordBatchReaderBuilder::try_new(file)?.schema().clone();
        return Ok(RecordBatch::new_empty(widened_schema(&schema)));
    };

    let schema = widened_schema(&first.schema());
    let widened = batches
        .iter()
        .map(|batch| widen_batch(batch, &schema))
        .collect::<Result<Vec<_>>>()?;

    Ok(concat_batches(&schema, &widened)?)
}
