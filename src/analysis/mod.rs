//! Segment analysis over establishment registrations.
//!
//! [`EstablishmentAnalysis`] owns the enriched dataset. It is loaded once
//! with [`EstablishmentAnalysis::load_and_preprocess`]; each report then
//! filters and groups it independently and writes one CSV file to the
//! output directory.

pub mod aggregate;
pub mod reports;

use std::path::{Path, PathBuf};
use std::time::Instant;

use arrow::record_batch::RecordBatch;

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::error::util::ensure_directory;
use crate::preprocess::{ReferenceTables, preprocess};
use crate::utils::io::{read_parquet_table, write_csv};
use crate::utils::logging::{
    create_main_progress_bar, finish_progress_bar, log_report_written,
};

pub use reports::{
    ACTIVE_COUNT_FILE, COMMON_CLASSIFICATIONS_FILE, GEOGRAPHIC_DISTRIBUTION_FILE,
    INACTIVITY_REASONS_FILE, OPENING_TREND_FILE,
};

/// Report generator for one segment of establishments
#[derive(Debug)]
pub struct EstablishmentAnalysis {
    config: AnalysisConfig,
    dataset: Option<RecordBatch>,
}

impl EstablishmentAnalysis {
    /// Create the analysis, making sure the output directory exists
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        ensure_directory(&config.output_dir, "report output")?;
        Ok(Self {
            config,
            dataset: None,
        })
    }

    #[must_use]
    pub fn targets(&self) -> &[i64] {
        &self.config.target_codes
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    /// The enriched dataset, once loaded
    #[must_use]
    pub fn dataset(&self) -> Option<&RecordBatch> {
        self.dataset.as_ref()
    }

    /// Read the establishment table and the reference tables, assign
    /// `column_names` by position and build the enriched dataset
    pub fn load_and_preprocess<S: AsRef<str>>(&mut self, column_names: &[S]) -> Result<()> {
        let start = Instant::now();

        let raw = read_parquet_table(&self.config.establishment_path(), self.config.batch_size)?;
        let references = ReferenceTables::load(&self.config)?;
        let dataset = preprocess(&raw, column_names, &references)?;

        log::info!(
            "Loaded {} establishments with {} columns in {:?}",
            dataset.num_rows(),
            dataset.num_columns(),
            start.elapsed()
        );
        self.dataset = Some(dataset);
        Ok(())
    }

    fn write_report(
        &self,
        name: &str,
        file_name: &str,
        report: RecordBatch,
    ) -> Result<RecordBatch> {
        let path: PathBuf = self.config.output_dir.join(file_name);
        write_csv(&report, &path)?;
        log_report_written(name, &path, report.num_rows());
        Ok(report)
    }

    /// Active establishments in the segment -> `empresas_ativas.csv`
    pub fn count_active(&self) -> Result<RecordBatch> {
        let report = reports::active_count(self.dataset(), self.targets())?;
        self.write_report("active count", ACTIVE_COUNT_FILE, report)
    }

    /// Active establishments by month, city and state ->
    /// `estados_cidades_mais_concentrados.csv`
    pub fn geographic_distribution(&self) -> Result<RecordBatch> {
        let report = reports::geographic_distribution(self.dataset(), self.targets())?;
        self.write_report("geographic distribution", GEOGRAPHIC_DISTRIBUTION_FILE, report)
    }

    /// Active establishments by state and classification ->
    /// `cnaes_mais_comuns_ativos.csv`
    pub fn common_classifications(&self) -> Result<RecordBatch> {
        let report = reports::common_classifications(self.dataset(), self.targets())?;
        self.write_report("common classifications", COMMON_CLASSIFICATIONS_FILE, report)
    }

    /// Monthly openings by state over the last ten years ->
    /// `tendencia_abertura.csv`
    pub fn opening_trend(&self) -> Result<RecordBatch> {
        let report = reports::opening_trend(self.dataset(), self.targets())?;
        self.write_report("opening trend", OPENING_TREND_FILE, report)
    }

    /// Deactivations by month, reason and state -> `motivos_inatividade.csv`
    pub fn inactivity_reasons(&self) -> Result<RecordBatch> {
        let report = reports::inactivity_reasons(self.dataset(), self.targets())?;
        self.write_report("inactivity reasons", INACTIVITY_REASONS_FILE, report)
    }

    /// Run every report in sequence, stopping at the first failure
    pub fn run_all(&self) -> Result<()> {
        type Report = fn(&EstablishmentAnalysis) -> Result<RecordBatch>;
        let stages: [(&str, Report); 5] = [
            ("active count", Self::count_active),
            ("geographic distribution", Self::geographic_distribution),
            ("common classifications", Self::common_classifications),
            ("opening trend", Self::opening_trend),
            ("inactivity reasons", Self::inactivity_reasons),
        ];

        let pb = create_main_progress_bar(stages.len() as u64, Some("Generating reports"));
        for (name, report) in stages {
            pb.set_message(name);
            report(self)?;
            pb.inc(1);
        }
        finish_progress_bar(&pb, Some("Reports written"));

        Ok(())
    }
}
