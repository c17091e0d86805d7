//! Configuration for the segment analysis.

use std::path::{Path, PathBuf};

/// Default batch size for Parquet reading
pub const DEFAULT_BATCH_SIZE: usize = 16384;

/// Classification codes analysed by default (retail food and restaurants)
pub const DEFAULT_TARGET_CODES: [i64; 6] = [4721102, 5611201, 5611203, 5611204, 5611205, 5620104];

/// Text encoding of a reference table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8; invalid sequences are an error
    Utf8,
    /// ISO-8859-1, one byte per character
    Latin1,
}

impl TextEncoding {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Latin1 => "ISO-8859-1",
        }
    }
}

/// Location and encoding of one `;`-separated reference table
#[derive(Debug, Clone)]
pub struct ReferenceTableConfig {
    /// File name relative to the data directory
    pub file_name: String,
    /// Encoding of the description column
    pub encoding: TextEncoding,
}

impl ReferenceTableConfig {
    pub fn new(file_name: impl Into<String>, encoding: TextEncoding) -> Self {
        Self {
            file_name: file_name.into(),
            encoding,
        }
    }
}

/// Configuration for an analysis run
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Directory holding the establishment table and reference tables
    pub data_dir: PathBuf,
    /// Establishment table (Parquet) file name
    pub establishment_file: String,
    /// Classification code -> activity description
    pub classification_table: ReferenceTableConfig,
    /// Municipality code -> city name
    pub municipality_table: ReferenceTableConfig,
    /// Status reason code -> reason description
    pub status_reason_table: ReferenceTableConfig,
    /// Directory the reports are written to (created if missing)
    pub output_dir: PathBuf,
    /// Rows per batch when reading Parquet
    pub batch_size: usize,
    /// Classification codes defining the segment
    pub target_codes: Vec<i64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            establishment_file: "ESTABELECIMENTO.parquet".to_string(),
            classification_table: ReferenceTableConfig::new("CNAE.csv", TextEncoding::Latin1),
            municipality_table: ReferenceTableConfig::new("MUNICIPIOS.csv", TextEncoding::Utf8),
            status_reason_table: ReferenceTableConfig::new("MOTIVOS.csv", TextEncoding::Utf8),
            output_dir: PathBuf::from("output"),
            batch_size: DEFAULT_BATCH_SIZE,
            target_codes: DEFAULT_TARGET_CODES.to_vec(),
        }
    }
}

impl AnalysisConfig {
    /// Default configuration reading from `data_dir` and writing to `output_dir`
    #[must_use]
    pub fn with_dirs(data_dir: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            output_dir: output_dir.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn establishment_path(&self) -> PathBuf {
        self.data_dir.join(&self.establishment_file)
    }

    #[must_use]
    pub fn reference_path(&self, table: &ReferenceTableConfig) -> PathBuf {
        self.data_dir.join(&table.file_name)
    }
}
