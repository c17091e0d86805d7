//! Module for handling date parsing and month bucketing.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Date32Array, StringArray};
use arrow::datatypes::{DataType, Date32Type};
use chrono::{Datelike, NaiveDate};

use crate::error::{AnalysisError, Result};
use crate::schema::conversions::to_utf8;

/// Registry dates are stored as `YYYYMMDD`
pub const COMPACT_DATE_FORMAT: &str = "%Y%m%d";

/// Parse an 8-digit `YYYYMMDD` value. Anything else, including impossible
/// calendar dates such as `20230230`, yields `None`.
#[must_use]
pub fn parse_compact_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(s, COMPACT_DATE_FORMAT).ok()
}

/// Convert a column of compact dates (string or integer) to `Date32`.
///
/// Returns the converted array and the number of non-null inputs that could
/// not be parsed and were set to null.
pub fn parse_compact_date_column(array: &ArrayRef, column: &str) -> Result<(ArrayRef, usize)> {
    if array.data_type() == &DataType::Date32 {
        return Ok((array.clone(), 0));
    }

    let utf8 = to_utf8(array)?;
    let strings = utf8
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| AnalysisError::invalid_data_type(column, "StringArray"))?;

    let mut builder = Date32Array::builder(strings.len());
    let mut unparseable = 0;

    for i in 0..strings.len() {
        if strings.is_null(i) {
            builder.append_null();
            continue;
        }

        match parse_compact_date(strings.value(i)) {
            Some(date) => builder.append_value(Date32Type::from_naive_date(date)),
            None => {
                unparseable += 1;
                builder.append_null();
            }
        }
    }

    Ok((Arc::new(builder.finish()) as ArrayRef, unparseable))
}

/// Monthly period label, e.g. `2023-04`
#[must_use]
pub fn month_bucket(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// First day of the month containing `date`
#[must_use]
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
