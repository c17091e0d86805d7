//! Log lines for table loads, report writes and recovered anomalies.

use std::path::Path;
use std::time::Duration;

/// Announce that a named input table is about to be read
pub fn log_read_start(table: &str, path: &Path) {
    log::info!("Reading {table} from {}", path.display());
}

#[must_use]
pub fn table_loaded_message(table: &str, path: &Path, rows: usize, elapsed: Duration) -> String {
    format!(
        "Loaded {rows} rows of {table} from {} in {elapsed:?}",
        path.display()
    )
}

/// Log a finished table load with its row count and duration
pub fn log_table_loaded(table: &str, path: &Path, rows: usize, elapsed: Duration) {
    log::info!("{}", table_loaded_message(table, path, rows, elapsed));
}

#[must_use]
pub fn report_written_message(report: &str, path: &Path, rows: usize) -> String {
    let noun = if rows == 1 { "row" } else { "rows" };
    format!("Wrote {report} report ({rows} {noun}) to {}", path.display())
}

/// Log a report file written to the output directory
pub fn log_report_written(report: &str, path: &Path, rows: usize) {
    log::info!("{}", report_written_message(report, path, rows));
}

/// Log a recovered anomaly, optionally tied to a file
///
/// # Arguments
/// * `message` - Warning message
/// * `path` - Optional path related to the warning
pub fn log_warning(message: &str, path: Option<&Path>) {
    if let Some(path) = path {
        log::warn!("{}: {}", message, path.display());
    } else {
        log::warn!("{message}");
    }
}
