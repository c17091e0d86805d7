//! Group-by-count over record batches.
//!
//! Rows with a null in any key column are not counted. Groups come out in
//! ascending key order.

use std::collections::BTreeMap;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Date32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Date32Type, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use itertools::Itertools;

use crate::error::{AnalysisError, Result};
use crate::schema::{QUANTIDADE, get_column, month_bucket, month_start, to_utf8};

/// A grouping key and how it is rendered in the output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey<'a> {
    /// `Int64` column, output as is
    Int(&'a str),
    /// Text column, output as is
    Text(&'a str),
    /// `Date32` column bucketed by month, output as `YYYY-MM`
    Month(&'a str),
    /// `Date32` column bucketed by month, output as the first day of the month
    MonthStart(&'a str),
}

impl GroupKey<'_> {
    #[must_use]
    pub fn column(&self) -> &str {
        match self {
            Self::Int(c) | Self::Text(c) | Self::Month(c) | Self::MonthStart(c) => c,
        }
    }

    fn output_type(&self) -> DataType {
        match self {
            Self::Int(_) => DataType::Int64,
            Self::Text(_) | Self::Month(_) => DataType::Utf8,
            Self::MonthStart(_) => DataType::Date32,
        }
    }
}

/// One component of a group key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyValue {
    Int(i64),
    Text(String),
    /// First day of a month
    Month(NaiveDate),
}

/// A group and the number of rows in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    pub key: Vec<KeyValue>,
    pub count: i64,
}

enum KeyColumn {
    Int(Int64Array),
    Text(StringArray),
    Month(Date32Array),
}

impl KeyColumn {
    fn extract(batch: &RecordBatch, key: &GroupKey<'_>) -> Result<Self> {
        let name = key.column();
        let array = get_column(batch, name)?;

        match key {
            GroupKey::Int(_) => array
                .as_any()
                .downcast_ref::<Int64Array>()
                .cloned()
                .map(Self::Int)
                .ok_or_else(|| AnalysisError::invalid_data_type(name, "Int64Array")),
            GroupKey::Text(_) => to_utf8(&array)?
                .as_any()
                .downcast_ref::<StringArray>()
                .cloned()
                .map(Self::Text)
                .ok_or_else(|| AnalysisError::invalid_data_type(name, "StringArray")),
            GroupKey::Month(_) | GroupKey::MonthStart(_) => array
                .as_any()
                .downcast_ref::<Date32Array>()
                .cloned()
                .map(Self::Month)
                .ok_or_else(|| AnalysisError::invalid_data_type(name, "Date32Array")),
        }
    }

    fn value(&self, row: usize) -> Option<KeyValue> {
        match self {
            Self::Int(a) => a.is_valid(row).then(|| KeyValue::Int(a.value(row))),
            Self::Text(a) => a.is_valid(row).then(|| KeyValue::Text(a.value(row).to_string())),
            Self::Month(a) => a
                .is_valid(row)
                .then(|| a.value_as_date(row))
                .flatten()
                .map(|d| KeyValue::Month(month_start(d))),
        }
    }
}

/// Count rows per distinct key
pub fn count_groups(batch: &RecordBatch, keys: &[GroupKey<'_>]) -> Result<Vec<GroupCount>> {
    let columns = keys
        .iter()
        .map(|key| KeyColumn::extract(batch, key))
        .collect::<Result<Vec<_>>>()?;

    let mut groups: BTreeMap<Vec<KeyValue>, i64> = BTreeMap::new();
    for row in 0..batch.num_rows() {
        let key: Option<Vec<KeyValue>> = columns.iter().map(|c| c.value(row)).collect();
        if let Some(key) = key {
            *groups.entry(key).or_insert(0) += 1;
        }
    }

    Ok(groups
        .into_iter()
        .map(|(key, count)| GroupCount { key, count })
        .collect())
}

/// Order groups by count, largest first; equal counts keep their order
#[must_use]
pub fn sort_by_count_desc(groups: Vec<GroupCount>) -> Vec<GroupCount> {
    groups
        .into_iter()
        .sorted_by(|a, b| b.count.cmp(&a.count))
        .collect()
}

fn key_array(key: &GroupKey<'_>, position: usize, groups: &[GroupCount]) -> Result<ArrayRef> {
    let values = groups.iter().map(|g| &g.key[position]);
    let mismatch = || AnalysisError::invalid_data_type(key.column(), "group key");

    let array: ArrayRef = match key {
        GroupKey::Int(_) => Arc::new(
            values
                .map(|v| match v {
                    KeyValue::Int(i) => Ok(Some(*i)),
                    _ => Err(mismatch()),
                })
                .collect::<Result<Int64Array>>()?,
        ),
        GroupKey::Text(_) => Arc::new(
            values
                .map(|v| match v {
                    KeyValue::Text(s) => Ok(s.as_str()),
                    _ => Err(mismatch()),
                })
                .collect::<Result<Vec<_>>>()
                .map(StringArray::from)?,
        ),
        GroupKey::Month(_) => Arc::new(
            values
                .map(|v| match v {
                    KeyValue::Month(d) => Ok(month_bucket(*d)),
                    _ => Err(mismatch()),
                })
                .collect::<Result<Vec<_>>>()
                .map(StringArray::from)?,
        ),
        GroupKey::MonthStart(_) => Arc::new(
            values
                .map(|v| match v {
                    KeyValue::Month(d) => Ok(Some(Date32Type::from_naive_date(*d))),
                    _ => Err(mismatch()),
                })
                .collect::<Result<Date32Array>>()?,
        ),
    };
    Ok(array)
}

/// Render groups as a batch: one column per key, named after the source
/// column, then `quantidade`
pub fn groups_to_batch(keys: &[GroupKey<'_>], groups: &[GroupCount]) -> Result<RecordBatch> {
    let mut fields: Vec<Field> = keys
        .iter()
        .map(|key| Field::new(key.column(), key.output_type(), false))
        .collect();
    fields.push(Field::new(QUANTIDADE, DataType::Int64, false));

    let mut columns = keys
        .iter()
        .enumerate()
        .map(|(position, key)| key_array(key, position, groups))
        .collect::<Result<Vec<_>>>()?;
    columns.push(Arc::new(Int64Array::from_iter_values(
        groups.iter().map(|g| g.count),
    )));

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}
