//! Preprocessing of the raw establishment table: positional renaming,
//! integer normalization, duplicate removal, reference joins and date
//! parsing.

pub mod dedup;
pub mod join;

use std::time::Instant;

use arrow::record_batch::RecordBatch;

use crate::config::{AnalysisConfig, ReferenceTableConfig};
use crate::error::Result;
use crate::schema::{
    ATIVIDADE_ECONOMICA, CIDADE, CNAE_FISCAL_PRINCIPAL, CODIGO_MOTIVO_SITUACAO_CADASTRAL,
    CODIGO_MUNICIPIO, DATA_INICIO_ATIVIDADE, DATA_SITUACAO_CADASTRAL, MOTIVO_SITUACAO_CADASTRAL,
    SITUACAO_CADASTRAL, fill_null_i64, get_column, parse_compact_date_column, rename_columns,
    replace_column, to_int64_strict,
};
use crate::utils::logging::log_warning;

pub use dedup::drop_duplicates;
pub use join::{ReferenceTable, left_join_reference};

/// The three lookup tables joined into the establishment table
#[derive(Debug, Clone, Default)]
pub struct ReferenceTables {
    /// Municipality code -> city name
    pub municipalities: ReferenceTable,
    /// Classification code -> activity description
    pub classifications: ReferenceTable,
    /// Status reason code -> reason description
    pub status_reasons: ReferenceTable,
}

impl ReferenceTables {
    /// Load the reference tables named in the configuration
    pub fn load(config: &AnalysisConfig) -> Result<Self> {
        let load = |name: &str, table: &ReferenceTableConfig| {
            ReferenceTable::load(name, &config.reference_path(table), table.encoding)
        };

        Ok(Self {
            municipalities: load("municipality table", &config.municipality_table)?,
            classifications: load("classification table", &config.classification_table)?,
            status_reasons: load("status reason table", &config.status_reason_table)?,
        })
    }
}

/// Integer columns after preprocessing
const INTEGER_COLUMNS: [&str; 2] = [CNAE_FISCAL_PRINCIPAL, SITUACAO_CADASTRAL];

/// Date columns stored as `YYYYMMDD`
const DATE_COLUMNS: [&str; 2] = [DATA_INICIO_ATIVIDADE, DATA_SITUACAO_CADASTRAL];

/// Turn the raw establishment table into the enriched dataset.
///
/// Deterministic: identical inputs give identical output.
pub fn preprocess<S: AsRef<str>>(
    raw: &RecordBatch,
    column_names: &[S],
    references: &ReferenceTables,
) -> Result<RecordBatch> {
    let start = Instant::now();
    let mut batch = rename_columns(raw, column_names)?;

    // Missing municipality codes become 0 before the integer cast
    let municipio = to_int64_strict(&get_column(&batch, CODIGO_MUNICIPIO)?, CODIGO_MUNICIPIO)?;
    let municipio = fill_null_i64(&municipio, 0, CODIGO_MUNICIPIO)?;
    batch = replace_column(&batch, CODIGO_MUNICIPIO, municipio)?;

    for column in INTEGER_COLUMNS {
        let ints = to_int64_strict(&get_column(&batch, column)?, column)?;
        batch = replace_column(&batch, column, ints)?;
    }

    batch = drop_duplicates(&batch)?;

    batch = left_join_reference(&batch, CODIGO_MUNICIPIO, &references.municipalities, CIDADE)?;
    batch = left_join_reference(
        &batch,
        CNAE_FISCAL_PRINCIPAL,
        &references.classifications,
        ATIVIDADE_ECONOMICA,
    )?;
    batch = left_join_reference(
        &batch,
        CODIGO_MOTIVO_SITUACAO_CADASTRAL,
        &references.status_reasons,
        MOTIVO_SITUACAO_CADASTRAL,
    )?;

    for column in DATE_COLUMNS {
        let (dates, unparseable) = parse_compact_date_column(&get_column(&batch, column)?, column)?;
        if unparseable > 0 {
            log_warning(
                &format!("{unparseable} value(s) in {column} are not valid YYYYMMDD dates; set to null"),
                None,
            );
        }
        batch = replace_column(&batch, column, dates)?;
    }

    log::info!(
        "Preprocessed {} raw rows into {} rows in {:?}",
        raw.num_rows(),
        batch.num_rows(),
        start.elapsed()
    );
    Ok(batch)
}
