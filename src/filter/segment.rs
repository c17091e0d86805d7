//! Segment selection: establishments of the target classification codes,
//! optionally restricted to a set of registration statuses.

use std::sync::Arc;

use arrow::record_batch::RecordBatch;
use itertools::Itertools;

use crate::error::{AnalysisError, Result};
use crate::filter::core::{AndFilter, BatchFilter, CodeSetFilter};
use crate::schema::{CNAE_FISCAL_PRINCIPAL, SITUACAO_CADASTRAL, column_index};

/// Active registration
pub const STATUS_ACTIVE: i64 = 2;

/// Suspended, unfit and closed registrations
pub const STATUS_INACTIVE: [i64; 3] = [3, 4, 8];

/// Status codes accepted by [`filter_segment`]
pub const ALLOWED_STATUS_CODES: [i64; 4] = [2, 3, 4, 8];

/// Registration status codes requested by a caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSelection(Vec<i64>);

impl StatusSelection {
    #[must_use]
    pub fn requested(&self) -> &[i64] {
        &self.0
    }

    /// Requested codes that are in the allowed set, in request order
    #[must_use]
    pub fn validated(&self) -> Vec<i64> {
        self.0
            .iter()
            .copied()
            .filter(|code| ALLOWED_STATUS_CODES.contains(code))
            .collect()
    }
}

impl From<i64> for StatusSelection {
    fn from(code: i64) -> Self {
        Self(vec![code])
    }
}

impl From<Vec<i64>> for StatusSelection {
    fn from(codes: Vec<i64>) -> Self {
        Self(codes)
    }
}

impl From<&[i64]> for StatusSelection {
    fn from(codes: &[i64]) -> Self {
        Self(codes.to_vec())
    }
}

impl<const N: usize> From<[i64; N]> for StatusSelection {
    fn from(codes: [i64; N]) -> Self {
        Self(codes.to_vec())
    }
}

/// Keep the rows whose classification code is in `target_codes` and, when
/// `status` is given, whose registration status is one of the valid
/// requested codes.
///
/// Requested status codes outside {2, 3, 4, 8} are dropped. If none remain
/// the call fails with `InvalidStatus`. A missing or empty dataset fails
/// with `EmptyInput`.
pub fn filter_segment(
    dataset: Option<&RecordBatch>,
    target_codes: &[i64],
    status: Option<StatusSelection>,
) -> Result<RecordBatch> {
    let dataset = match dataset {
        Some(batch) if batch.num_rows() > 0 => batch,
        _ => return Err(AnalysisError::EmptyInput),
    };

    let mut filters: Vec<Arc<dyn BatchFilter + Send + Sync>> = vec![Arc::new(
        CodeSetFilter::new(CNAE_FISCAL_PRINCIPAL, target_codes.iter().copied()),
    )];

    if let Some(status) = status {
        let valid = status.validated();
        if valid.is_empty() {
            return Err(AnalysisError::InvalidStatus {
                requested: status.requested().to_vec(),
            });
        }
        filters.push(Arc::new(CodeSetFilter::new(SITUACAO_CADASTRAL, valid)));
    }

    // Checked up front: the AND chain stops early once no rows remain
    let segment_filter = AndFilter::new(filters);
    for column in segment_filter.required_columns().into_iter().sorted() {
        column_index(dataset, &column)?;
    }

    let segment = segment_filter.filter(dataset)?;
    log::debug!(
        "Segment filter kept {} of {} rows",
        segment.num_rows(),
        dataset.num_rows()
    );
    Ok(segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_code_is_a_singleton() {
        assert_eq!(StatusSelection::from(2).requested(), &[2]);
    }

    #[test]
    fn missing_status_column_is_reported_without_matches() {
        use arrow::array::Int64Array;
        use arrow::datatypes::{DataType, Field, Schema};

        let schema = Schema::new(vec![Field::new(CNAE_FISCAL_PRINCIPAL, DataType::Int64, true)]);
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![Arc::new(Int64Array::from(vec![9999999]))],
        )
        .unwrap();

        let err = filter_segment(Some(&batch), &[4721102], Some(2.into())).unwrap_err();
        assert!(
            matches!(&err, AnalysisError::ColumnNotFound(c) if c == SITUACAO_CADASTRAL),
            "got {err}"
        );

        // Without a status selection only the classification column is needed
        let segment = filter_segment(Some(&batch), &[4721102], None).unwrap();
        assert_eq!(segment.num_rows(), 0);
    }

    #[test]
    fn invalid_codes_are_dropped() {
        assert_eq!(StatusSelection::from(vec![1, 2, 9, 8]).validated(), vec![2, 8]);
        assert!(StatusSelection::from([1, 9]).validated().is_empty());
        assert!(StatusSelection::from(Vec::<i64>::new()).validated().is_empty());
    }
}
