//! Reference tables and the left join that attaches their descriptions.

use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Int64Array, StringArray};
use arrow::compute::kernels::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashMap;

use crate::config::TextEncoding;
use crate::error::{AnalysisError, Result};
use crate::schema::{append_column, get_column, to_utf8};
use crate::utils::io::read_reference_rows;

/// An integer code -> description lookup loaded from a reference file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceTable {
    entries: FxHashMap<i64, String>,
}

impl ReferenceTable {
    /// Build a table from `(code, description)` pairs. The first description
    /// of a repeated code wins, so a join never multiplies rows.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (i64, S)>,
        S: Into<String>,
    {
        let mut entries = FxHashMap::default();
        let mut repeated = 0usize;
        for (code, description) in pairs {
            if entries.contains_key(&code) {
                repeated += 1;
                continue;
            }
            entries.insert(code, description.into());
        }
        if repeated > 0 {
            log::warn!(
                "Reference table has {repeated} repeated code(s); keeping the first description \
                 of each, so joined rows are not repeated per match as in a relational left join"
            );
        }
        Self { entries }
    }

    /// Load a `;`-separated `code;description` file
    pub fn load(name: &str, path: &Path, encoding: TextEncoding) -> Result<Self> {
        Ok(Self::from_pairs(read_reference_rows(name, path, encoding)?))
    }

    #[must_use]
    pub fn get(&self, code: i64) -> Option<&str> {
        self.entries.get(&code).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Join keys as integers. Integer columns are widened; text keys such as
/// `"01"` are parsed, and values that do not parse simply do not match.
fn join_keys(array: &ArrayRef, column: &str) -> Result<ArrayRef> {
    match array.data_type() {
        DataType::Int64 => Ok(array.clone()),
        DataType::Utf8 => {
            let strings = array
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| AnalysisError::invalid_data_type(column, "StringArray"))?;
            let keys: Int64Array = strings
                .iter()
                .map(|v| v.and_then(|s| s.trim().parse::<i64>().ok()))
                .collect();
            Ok(Arc::new(keys) as ArrayRef)
        }
        DataType::LargeUtf8 | DataType::Utf8View => join_keys(&to_utf8(array)?, column),
        _ => Ok(cast::cast(array, &DataType::Int64)?),
    }
}

/// Left join `table` on `key_column`, appending the description as
/// `value_column`. Every input row is kept; unmatched or null keys get a
/// null description.
pub fn left_join_reference(
    batch: &RecordBatch,
    key_column: &str,
    table: &ReferenceTable,
    value_column: &str,
) -> Result<RecordBatch> {
    let keys = join_keys(&get_column(batch, key_column)?, key_column)?;
    let keys = keys
        .as_any()
        .downcast_ref::<Int64Array>()
        .ok_or_else(|| AnalysisError::invalid_data_type(key_column, "Int64Array"))?;

    let descriptions: StringArray = keys
        .iter()
        .map(|key| key.and_then(|k| table.get(k)))
        .collect();

    let unmatched = descriptions.null_count();
    if unmatched > 0 {
        log::debug!(
            "{unmatched} of {} rows have no match for {key_column} -> {value_column}",
            batch.num_rows()
        );
    }

    append_column(batch, value_column, Arc::new(descriptions))
}
