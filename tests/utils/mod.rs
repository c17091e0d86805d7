//! Shared fixtures: raw establishment tables and reference files written
//! into a temporary data directory.
#![allow(dead_code)]

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use cnpj_segment::{ESTABLISHMENT_COLUMNS, RecordBatch};
use parquet::arrow::ArrowWriter;

/// One raw establishment; every value is text, as in the registry dump
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    pub cnpj: &'static str,
    pub status: Option<&'static str>,
    pub status_date: Option<&'static str>,
    pub reason: Option<&'static str>,
    pub start_date: Option<&'static str>,
    pub cnae: Option<&'static str>,
    pub uf: Option<&'static str>,
    pub municipality: Option<&'static str>,
}

impl RawRow {
    fn value(&self, column: &str) -> Option<&'static str> {
        match column {
            "cnpj_basico" => Some(self.cnpj),
            "situacao_cadastral" => self.status,
            "data_situacao_cadastral" => self.status_date,
            "codigo_motivo_situacao_cadastral" => self.reason,
            "data_inicio_atividade" => self.start_date,
            "cnae_fiscal_principal" => self.cnae,
            "uf" => self.uf,
            "codigo_municipio" => self.municipality,
            _ => Some(""),
        }
    }
}

/// Raw table with anonymous column names `c0..c29`, in registry order
pub fn raw_establishments(rows: &[RawRow]) -> RecordBatch {
    let fields: Vec<Field> = (0..ESTABLISHMENT_COLUMNS.len())
        .map(|i| Field::new(format!("c{i}"), DataType::Utf8, true))
        .collect();
    let columns: Vec<ArrayRef> = ESTABLISHMENT_COLUMNS
        .iter()
        .map(|column| {
            let values: StringArray = rows.iter().map(|row| row.value(column)).collect();
            Arc::new(values) as ArrayRef
        })
        .collect();

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).unwrap()
}

/// An already-normalized table holding only code and status columns
pub fn coded_batch(codes: &[Option<i64>], statuses: &[Option<i64>]) -> RecordBatch {
    let schema = Schema::new(vec![
        Field::new("cnae_fiscal_principal", DataType::Int64, true),
        Field::new("situacao_cadastral", DataType::Int64, true),
    ]);
    RecordBatch::try_new(
        Arc::new(schema),
        vec![
            Arc::new(Int64Array::from(codes.to_vec())),
            Arc::new(Int64Array::from(statuses.to_vec())),
        ],
    )
    .unwrap()
}

pub fn write_parquet(batch: &RecordBatch, path: &Path) {
    let file = File::create(path).unwrap();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
    writer.write(batch).unwrap();
    writer.close().unwrap();
}

/// "Lanchonetes, casas de chá, de sucos e similares" in ISO-8859-1
pub const LANCHONETES_LATIN1: &[u8] = b"Lanchonetes, casas de ch\xe1, de sucos e similares";

/// Write `ESTABELECIMENTO.parquet` plus the three reference tables
pub fn write_data_dir(dir: &Path, rows: &[RawRow]) {
    write_parquet(&raw_establishments(rows), &dir.join("ESTABELECIMENTO.parquet"));

    let mut cnae = Vec::new();
    cnae.extend_from_slice(b"\"4721102\";\"Padaria e confeitaria com predomin\xe2ncia de revenda\"\n");
    cnae.extend_from_slice(b"\"5611201\";\"Restaurantes e similares\"\n");
    cnae.extend_from_slice(b"\"5611203\";\"");
    cnae.extend_from_slice(LANCHONETES_LATIN1);
    cnae.extend_from_slice(b"\"\n");
    std::fs::write(dir.join("CNAE.csv"), cnae).unwrap();

    std::fs::write(
        dir.join("MUNICIPIOS.csv"),
        "\"7107\";\"SAO PAULO\"\n\"6001\";\"RIO DE JANEIRO\"\n\"4123\";\"BELO HORIZONTE\"\n",
    )
    .unwrap();

    std::fs::write(
        dir.join("MOTIVOS.csv"),
        "\"00\";\"SEM MOTIVO\"\n\"01\";\"EXTINCAO POR ENCERRAMENTO LIQUIDACAO VOLUNTARIA\"\n",
    )
    .unwrap();
}

pub fn read_report(path: &Path) -> String {
    std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("report {} not written: {e}", path.display()))
}
