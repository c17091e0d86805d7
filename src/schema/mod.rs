//! Column layout of the establishment table and helpers for reshaping
//! record batches (renaming, replacing and appending columns).

use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;

use crate::error::{AnalysisError, Result};

pub mod conversions;
pub mod date_utils;

pub use conversions::{fill_null_i64, to_int64_strict, to_utf8};
pub use date_utils::{month_bucket, month_start, parse_compact_date, parse_compact_date_column};

pub const CNPJ_BASICO: &str = "cnpj_basico";
pub const NOME_FANTASIA: &str = "nome_fantasia";
pub const SITUACAO_CADASTRAL: &str = "situacao_cadastral";
pub const DATA_SITUACAO_CADASTRAL: &str = "data_situacao_cadastral";
pub const CODIGO_MOTIVO_SITUACAO_CADASTRAL: &str = "codigo_motivo_situacao_cadastral";
pub const DATA_INICIO_ATIVIDADE: &str = "data_inicio_atividade";
pub const CNAE_FISCAL_PRINCIPAL: &str = "cnae_fiscal_principal";
pub const UF: &str = "uf";
pub const CODIGO_MUNICIPIO: &str = "codigo_municipio";

/// Joined from the municipality table
pub const CIDADE: &str = "cidade";
/// Joined from the classification table
pub const ATIVIDADE_ECONOMICA: &str = "atividade_economica";
/// Joined from the status reason table
pub const MOTIVO_SITUACAO_CADASTRAL: &str = "motivo_situacao_cadastral";

/// Count column of every grouped report
pub const QUANTIDADE: &str = "quantidade";

/// Column order of the establishment Parquet file
pub const ESTABLISHMENT_COLUMNS: [&str; 30] = [
    "cnpj_basico",
    "cnpj_ordem",
    "cnpj_dv",
    "identificador_matriz_filial",
    "nome_fantasia",
    "situacao_cadastral",
    "data_situacao_cadastral",
    "codigo_motivo_situacao_cadastral",
    "nome_cidade_exterior",
    "pais",
    "data_inicio_atividade",
    "cnae_fiscal_principal",
    "cnae_fiscal_secundaria",
    "tipo_logradouro",
    "logradouro",
    "numero",
    "complemento",
    "bairro",
    "cep",
    "uf",
    "codigo_municipio",
    "ddd1",
    "telefone1",
    "ddd2",
    "telefone2",
    "ddd_fax",
    "fax",
    "correio_eletronico",
    "situacao_especial",
    "data_situacao_especial",
];

/// Assign new column names by position.
///
/// Fails with `SchemaMismatch` unless exactly one name per column is given.
pub fn rename_columns<S: AsRef<str>>(batch: &RecordBatch, names: &[S]) -> Result<RecordBatch> {
    if names.len() != batch.num_columns() {
        return Err(AnalysisError::SchemaMismatch {
            expected: names.len(),
            actual: batch.num_columns(),
        });
    }

    let fields: Vec<Field> = batch
        .schema()
        .fields()
        .iter()
        .zip(names)
        .map(|(field, name)| field.as_ref().clone().with_name(name.as_ref()))
        .collect();

    Ok(RecordBatch::try_new(
        Arc::new(Schema::new(fields)),
        batch.columns().to_vec(),
    )?)
}

/// Swap the array of an existing column, keeping its position and name
pub fn replace_column(batch: &RecordBatch, name: &str, array: ArrayRef) -> Result<RecordBatch> {
    let idx = column_index(batch, name)?;

    let schema = batch.schema();
    let mut fields: Vec<Field> = schema.fields().iter().map(|f| f.as_ref().clone()).collect();
    fields[idx] = Field::new(name, array.data_type().clone(), true);

    let mut columns = batch.columns().to_vec();
    columns[idx] = array;

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}

/// Add a column at the end of the batch
pub fn append_column(batch: &RecordBatch, name: &str, array: ArrayRef) -> Result<RecordBatch> {
    let schema = batch.schema();
    let mut fields: Vec<Field> = schema.fields().iter().map(|f| f.as_ref().clone()).collect();
    fields.push(Field::new(name, array.data_type().clone(), true));

    let mut columns = batch.columns().to_vec();
    columns.push(array);

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}

/// Index of a column by name, as a typed error when absent
pub fn column_index(batch: &RecordBatch, name: &str) -> Result<usize> {
    batch
        .schema()
        .index_of(name)
        .map_err(|_| AnalysisError::column_not_found(name))
}

/// Get a column from a record batch by name
pub fn get_column(batch: &RecordBatch, name: &str) -> Result<ArrayRef> {
    let idx = column_index(batch, name)?;
    Ok(batch.column(idx).clone())
}
