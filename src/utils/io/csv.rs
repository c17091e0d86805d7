//! Delimited text files: `;`-separated reference tables in, headered report
//! CSVs out.

use std::borrow::Cow;
use std::fs::File;
use std::path::Path;
use std::time::Instant;

use arrow::csv::WriterBuilder;
use arrow::record_batch::RecordBatch;
use csv::ReaderBuilder;

use crate::config::TextEncoding;
use crate::error::util::safe_open_file;
use crate::error::{AnalysisError, Result};
use crate::utils::logging::{log_read_start, log_table_loaded, log_warning};

/// Reference tables use `;` and have no header row
pub const REFERENCE_DELIMITER: u8 = b';';

/// Decode raw field bytes with the table's encoding.
///
/// ISO-8859-1 always decodes. UTF-8 returns `None` on a malformed sequence.
#[must_use]
pub fn decode_field(bytes: &[u8], encoding: TextEncoding) -> Option<String> {
    match encoding {
        TextEncoding::Latin1 => Some(encoding_rs::mem::decode_latin1(bytes).into_owned()),
        TextEncoding::Utf8 => encoding_rs::UTF_8
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(Cow::into_owned),
    }
}

/// Read a two-column `code;description` table.
///
/// `table` names the table in log lines and errors. Rows whose code is not
/// an integer are skipped with a warning. Rows with fewer than two fields,
/// or with bytes that are not valid in `encoding`, are an error.
pub fn read_reference_rows(
    table: &str,
    path: &Path,
    encoding: TextEncoding,
) -> Result<Vec<(i64, String)>> {
    let start = Instant::now();
    log_read_start(table, path);

    let file = safe_open_file(path, table)?;
    let mut reader = ReaderBuilder::new()
        .delimiter(REFERENCE_DELIMITER)
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let malformed = |message: String| {
        AnalysisError::reference_table(format!("{table} ({})", path.display()), message)
    };

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for (index, record) in reader.byte_records().enumerate() {
        let record = record?;
        let line = index + 1;
        let (Some(code), Some(description)) = (record.get(0), record.get(1)) else {
            return Err(malformed(format!(
                "line {line} has {} field(s), expected 2",
                record.len()
            )));
        };

        let decode = |bytes: &[u8]| {
            decode_field(bytes, encoding).ok_or_else(|| {
                malformed(format!("line {line} is not valid {}", encoding.label()))
            })
        };
        let code = decode(code)?;
        let description = decode(description)?;

        match code.trim().parse::<i64>() {
            Ok(code) => rows.push((code, description)),
            Err(_) => {
                log::debug!("Skipping line {line} with non-numeric code '{code}'");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        log_warning(
            &format!("Skipped {skipped} {table} row(s) with a non-numeric code"),
            Some(path),
        );
    }

    log_table_loaded(table, path, rows.len(), start.elapsed());
    Ok(rows)
}

/// Write a record batch as a headered, comma-separated file
pub fn write_csv(batch: &RecordBatch, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);
    writer.write(batch)?;
    Ok(())
}
