mod utils;

use arrow::array::{Array, Date32Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use chrono::NaiveDate;
use cnpj_segment::schema::{
    CIDADE, CNPJ_BASICO, CODIGO_MUNICIPIO, DATA_INICIO_ATIVIDADE, MOTIVO_SITUACAO_CADASTRAL,
};
use cnpj_segment::{
    AnalysisError, ESTABLISHMENT_COLUMNS, RecordBatch, ReferenceTable, ReferenceTables, preprocess,
};

use utils::{RawRow, raw_establishments};

fn references() -> ReferenceTables {
    ReferenceTables {
        municipalities: ReferenceTable::from_pairs([(7107, "SAO PAULO"), (6001, "RIO DE JANEIRO")]),
        classifications: ReferenceTable::from_pairs([(4721102, "Padaria e confeitaria")]),
        status_reasons: ReferenceTable::from_pairs([(0, "SEM MOTIVO"), (1, "EXTINCAO")]),
    }
}

fn rows() -> Vec<RawRow> {
    let base = RawRow {
        cnpj: "11111111",
        status: Some("02"),
        status_date: Some("20230115"),
        reason: Some("00"),
        start_date: Some("20230115"),
        cnae: Some("4721102"),
        uf: Some("SP"),
        municipality: Some("7107"),
    };
    vec![
        base.clone(),
        base.clone(),
        RawRow {
            cnpj: "22222222",
            start_date: Some("20230230"),
            municipality: None,
            ..base.clone()
        },
        RawRow {
            cnpj: "33333333",
            municipality: Some("9999"),
            reason: Some("42"),
            ..base
        },
    ]
}

fn strings(batch: &RecordBatch, column: &str) -> Vec<Option<String>> {
    batch
        .column_by_name(column)
        .unwrap()
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap()
        .iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

#[test]
fn enriches_and_normalizes_raw_rows() {
    let dataset = preprocess(&raw_establishments(&rows()), &ESTABLISHMENT_COLUMNS, &references())
        .unwrap();

    // Exact duplicate dropped
    assert_eq!(dataset.num_rows(), 3);
    assert_eq!(
        strings(&dataset, CNPJ_BASICO),
        vec![
            Some("11111111".to_string()),
            Some("22222222".to_string()),
            Some("33333333".to_string())
        ]
    );

    let municipio = dataset
        .column_by_name(CODIGO_MUNICIPIO)
        .unwrap()
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap();
    assert_eq!(municipio.null_count(), 0);
    assert_eq!(municipio.values().to_vec(), vec![7107, 0, 9999]);

    assert_eq!(
        strings(&dataset, CIDADE),
        vec![Some("SAO PAULO".to_string()), None, None]
    );
    assert_eq!(
        strings(&dataset, MOTIVO_SITUACAO_CADASTRAL),
        vec![Some("SEM MOTIVO".to_string()), Some("SEM MOTIVO".to_string()), None]
    );

    let start = dataset
        .column_by_name(DATA_INICIO_ATIVIDADE)
        .unwrap()
        .as_any()
        .downcast_ref::<Date32Array>()
        .unwrap();
    assert_eq!(start.value_as_date(0), NaiveDate::from_ymd_opt(2023, 1, 15));
    assert!(start.is_null(1));
}

#[test]
fn output_columns_and_types() {
    let dataset = preprocess(&raw_establishments(&rows()), &ESTABLISHMENT_COLUMNS, &references())
        .unwrap();
    let schema = dataset.schema();

    assert_eq!(schema.fields().len(), ESTABLISHMENT_COLUMNS.len() + 3);
    for (field, name) in schema.fields().iter().zip(ESTABLISHMENT_COLUMNS) {
        assert_eq!(field.name(), name);
    }
    for column in ["cnae_fiscal_principal", "situacao_cadastral", "codigo_municipio"] {
        assert_eq!(
            schema.field_with_name(column).unwrap().data_type(),
            &DataType::Int64
        );
    }
    for column in ["data_inicio_atividade", "data_situacao_cadastral"] {
        assert_eq!(
            schema.field_with_name(column).unwrap().data_type(),
            &DataType::Date32
        );
    }
}

#[test]
fn preprocessing_is_deterministic() {
    let raw = raw_establishments(&rows());
    let first = preprocess(&raw, &ESTABLISHMENT_COLUMNS, &references()).unwrap();
    let second = preprocess(&raw, &ESTABLISHMENT_COLUMNS, &references()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn column_count_mismatch_is_rejected() {
    let raw = raw_establishments(&rows());
    let err = preprocess(&raw, &ESTABLISHMENT_COLUMNS[..29], &references()).unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::SchemaMismatch {
            expected: 29,
            actual: 30
        }
    ));
}

#[test]
fn non_numeric_status_is_a_cast_error() {
    let raw = raw_establishments(&[RawRow {
        cnpj: "44444444",
        status: Some("ativa"),
        cnae: Some("4721102"),
        ..Default::default()
    }]);
    let err = preprocess(&raw, &ESTABLISHMENT_COLUMNS, &references()).unwrap_err();
    match err {
        AnalysisError::Cast { column, .. } => assert_eq!(column, "situacao_cadastral"),
        other => panic!("unexpected error: {other}"),
    }
}
