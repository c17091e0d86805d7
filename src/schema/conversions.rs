//! Explicit type conversions applied while normalizing the establishment table.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Int64Array, StringArray};
use arrow::compute::kernels::cast::{self, CastOptions};
use arrow::datatypes::DataType;
use arrow::error::ArrowError;

use crate::error::{AnalysisError, Result};

/// Convert a column to `Int64`, failing on any value that is not an integer.
///
/// Nulls stay null. Strings are trimmed before parsing.
pub fn to_int64_strict(array: &ArrayRef, column: &str) -> Result<ArrayRef> {
    match array.data_type() {
        DataType::Int64 => Ok(array.clone()),
        DataType::Utf8 => {
            let strings = array
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| AnalysisError::invalid_data_type(column, "StringArray"))?;
            parse_strings_to_int64(strings, column)
        }
        DataType::LargeUtf8 | DataType::Utf8View => {
            let utf8 = to_utf8(array)?;
            to_int64_strict(&utf8, column)
        }
        _ => {
            let options = CastOptions {
                safe: false,
                ..Default::default()
            };
            cast::cast_with_options(array, &DataType::Int64, &options).map_err(|source| {
                AnalysisError::Cast {
                    column: column.to_string(),
                    source,
                }
            })
        }
    }
}

fn parse_strings_to_int64(strings: &StringArray, column: &str) -> Result<ArrayRef> {
    let mut builder = Int64Array::builder(strings.len());

    for i in 0..strings.len() {
        if strings.is_null(i) {
            builder.append_null();
            continue;
        }

        let raw = strings.value(i).trim();
        let value = raw.parse::<i64>().map_err(|e| AnalysisError::Cast {
            column: column.to_string(),
            source: ArrowError::CastError(format!("'{raw}' at row {i}: {e}")),
        })?;
        builder.append_value(value);
    }

    Ok(Arc::new(builder.finish()) as ArrayRef)
}

/// Replace nulls of an `Int64` array with `value`
pub fn fill_null_i64(array: &ArrayRef, value: i64, column: &str) -> Result<ArrayRef> {
    let ints = array
        .as_any()
        .downcast_ref::<Int64Array>()
        .ok_or_else(|| AnalysisError::invalid_data_type(column, "Int64Array"))?;

    if ints.null_count() == 0 {
        return Ok(array.clone());
    }

    let filled: Int64Array = ints.iter().map(|v| Some(v.unwrap_or(value))).collect();
    Ok(Arc::new(filled) as ArrayRef)
}

/// Render any array as `Utf8`, keeping nulls
pub fn to_utf8(array: &ArrayRef) -> Result<ArrayRef> {
    if array.data_type() == &DataType::Utf8 {
        return Ok(array.clone());
    }
    Ok(cast::cast(array, &DataType::Utf8)?)
}
