//! Logging utilities for output and progress tracking
//!
//! Table-load and report-write log lines, plus the report progress bar.

pub mod log;
pub mod progress;

pub use log::{log_read_start, log_report_written, log_table_loaded, log_warning};
pub use progress::{create_main_progress_bar, finish_progress_bar};
