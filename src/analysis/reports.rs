//! The five segment reports, as pure functions over the enriched dataset.

use std::sync::Arc;

use arrow::array::Int64Array;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::Months;

use crate::analysis::aggregate::{
    GroupKey, count_groups, groups_to_batch, sort_by_count_desc,
};
use crate::error::Result;
use crate::filter::{
    BatchFilter, DateRangeFilter, STATUS_ACTIVE, STATUS_INACTIVE, filter_segment, max_date,
};
use crate::schema::{
    ATIVIDADE_ECONOMICA, CIDADE, CNAE_FISCAL_PRINCIPAL, DATA_INICIO_ATIVIDADE,
    DATA_SITUACAO_CADASTRAL, MOTIVO_SITUACAO_CADASTRAL, QUANTIDADE, UF, rename_columns,
};

pub const ACTIVE_COUNT_FILE: &str = "empresas_ativas.csv";
pub const GEOGRAPHIC_DISTRIBUTION_FILE: &str = "estados_cidades_mais_concentrados.csv";
pub const COMMON_CLASSIFICATIONS_FILE: &str = "cnaes_mais_comuns_ativos.csv";
pub const OPENING_TREND_FILE: &str = "tendencia_abertura.csv";
pub const INACTIVITY_REASONS_FILE: &str = "motivos_inatividade.csv";

/// Length of the opening-trend window
pub const TREND_WINDOW_YEARS: u32 = 10;

pub const TOTAL_GERAL: &str = "total_geral";
pub const MOTIVO: &str = "motivo";

/// Number of active establishments in the segment, as a one-cell table
pub fn active_count(dataset: Option<&RecordBatch>, targets: &[i64]) -> Result<RecordBatch> {
    let active = filter_segment(dataset, targets, Some(STATUS_ACTIVE.into()))?;
    let total = i64::try_from(active.num_rows()).unwrap_or(i64::MAX);

    let schema = Schema::new(vec![Field::new(TOTAL_GERAL, DataType::Int64, false)]);
    Ok(RecordBatch::try_new(
        Arc::new(schema),
        vec![Arc::new(Int64Array::from(vec![total]))],
    )?)
}

/// Active establishments per (activity-start month, city, state), most
/// concentrated first
pub fn geographic_distribution(
    dataset: Option<&RecordBatch>,
    targets: &[i64],
) -> Result<RecordBatch> {
    let active = filter_segment(dataset, targets, Some(STATUS_ACTIVE.into()))?;

    let keys = [
        GroupKey::Month(DATA_INICIO_ATIVIDADE),
        GroupKey::Text(CIDADE),
        GroupKey::Text(UF),
    ];
    let groups = sort_by_count_desc(count_groups(&active, &keys)?);
    groups_to_batch(&keys, &groups)
}

/// Active establishments per (state, classification code, activity)
pub fn common_classifications(
    dataset: Option<&RecordBatch>,
    targets: &[i64],
) -> Result<RecordBatch> {
    let active = filter_segment(dataset, targets, Some(STATUS_ACTIVE.into()))?;

    let keys = [
        GroupKey::Text(UF),
        GroupKey::Int(CNAE_FISCAL_PRINCIPAL),
        GroupKey::Text(ATIVIDADE_ECONOMICA),
    ];
    groups_to_batch(&keys, &count_groups(&active, &keys)?)
}

/// Openings per (month, state) over the ten years up to the latest
/// activity-start date in the segment, any status
pub fn opening_trend(dataset: Option<&RecordBatch>, targets: &[i64]) -> Result<RecordBatch> {
    let segment = filter_segment(dataset, targets, None)?;
    let keys = [GroupKey::MonthStart(DATA_INICIO_ATIVIDADE), GroupKey::Text(UF)];

    let Some(latest) = max_date(&segment, DATA_INICIO_ATIVIDADE)? else {
        log::warn!("No activity-start dates in the segment; opening trend is empty");
        return groups_to_batch(&keys, &[]);
    };
    let limit = latest
        .checked_sub_months(Months::new(TREND_WINDOW_YEARS * 12))
        .unwrap_or(chrono::NaiveDate::MIN);
    log::debug!("Opening trend window: {limit} to {latest}");

    let window = DateRangeFilter::new(DATA_INICIO_ATIVIDADE, Some(limit), None).filter(&segment)?;
    groups_to_batch(&keys, &count_groups(&window, &keys)?)
}

/// Inactive establishments per (status-change month, reason, state)
pub fn inactivity_reasons(dataset: Option<&RecordBatch>, targets: &[i64]) -> Result<RecordBatch> {
    let inactive = filter_segment(dataset, targets, Some(STATUS_INACTIVE.into()))?;

    let keys = [
        GroupKey::Month(DATA_SITUACAO_CADASTRAL),
        GroupKey::Text(MOTIVO_SITUACAO_CADASTRAL),
        GroupKey::Text(UF),
    ];
    let counts = groups_to_batch(&keys, &count_groups(&inactive, &keys)?)?;
    rename_columns(&counts, &[DATA_SITUACAO_CADASTRAL, MOTIVO, UF, QUANTIDADE])
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, ArrayRef, Date32Array, StringArray};
    use arrow::datatypes::Date32Type;
    use chrono::NaiveDate;

    use crate::schema::SITUACAO_CADASTRAL;

    fn date(y: i32, m: u32, d: u32) -> Option<i32> {
        NaiveDate::from_ymd_opt(y, m, d).map(Date32Type::from_naive_date)
    }

    fn dataset(start: Vec<Option<i32>>, status: Vec<i64>) -> RecordBatch {
        let n = start.len();
        let schema = Schema::new(vec![
            Field::new(CNAE_FISCAL_PRINCIPAL, DataType::Int64, true),
            Field::new(SITUACAO_CADASTRAL, DataType::Int64, true),
            Field::new(DATA_INICIO_ATIVIDADE, DataType::Date32, true),
            Field::new(DATA_SITUACAO_CADASTRAL, DataType::Date32, true),
            Field::new(UF, DataType::Utf8, true),
            Field::new(MOTIVO_SITUACAO_CADASTRAL, DataType::Utf8, true),
        ]);
        let columns: Vec<ArrayRef> = vec![
            Arc::new(Int64Array::from(vec![5611201; n])),
            Arc::new(Int64Array::from(status)),
            Arc::new(Date32Array::from(start.clone())),
            Arc::new(Date32Array::from(start)),
            Arc::new(StringArray::from(vec!["PR"; n])),
            Arc::new(StringArray::from(vec![Some("BAIXA"); n])),
        ];
        RecordBatch::try_new(Arc::new(schema), columns).unwrap()
    }

    fn counts(batch: &RecordBatch) -> Vec<i64> {
        batch
            .column_by_name(QUANTIDADE)
            .unwrap()
            .as_any()
            .downcast_ref::<Int64Array>()
            .unwrap()
            .values()
            .to_vec()
    }

    #[test]
    fn trend_window_from_leap_day_clamps_to_month_end() {
        // 2024-02-29 minus ten years is 2014-02-28
        let batch = dataset(
            vec![date(2024, 2, 29), date(2014, 2, 28), date(2014, 2, 27)],
            vec![2, 8, 2],
        );

        let trend = opening_trend(Some(&batch), &[5611201]).unwrap();
        let months = trend
            .column_by_name(DATA_INICIO_ATIVIDADE)
            .unwrap()
            .as_any()
            .downcast_ref::<Date32Array>()
            .unwrap()
            .clone();
        let months: Vec<_> = (0..months.len()).map(|i| months.value_as_date(i)).collect();

        assert_eq!(
            months,
            vec![
                NaiveDate::from_ymd_opt(2014, 2, 1),
                NaiveDate::from_ymd_opt(2024, 2, 1)
            ]
        );
        assert_eq!(counts(&trend), vec![1, 1]);
    }

    #[test]
    fn trend_without_dates_is_empty() {
        let batch = dataset(vec![None, None], vec![2, 2]);
        let trend = opening_trend(Some(&batch), &[5611201]).unwrap();
        assert_eq!(trend.num_rows(), 0);
        assert_eq!(trend.num_columns(), 3);
    }

    #[test]
    fn inactivity_report_columns() {
        let batch = dataset(vec![date(2020, 6, 1), date(2020, 6, 30)], vec![3, 2]);
        let report = inactivity_reasons(Some(&batch), &[5611201]).unwrap();

        let schema = report.schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(names, vec![DATA_SITUACAO_CADASTRAL, MOTIVO, UF, QUANTIDADE]);
        assert_eq!(counts(&report), vec![1]);
    }
}
