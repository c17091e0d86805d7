use anyhow::Context;
use cnpj_segment::{AnalysisConfig, ESTABLISHMENT_COLUMNS, EstablishmentAnalysis};
use log::info;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AnalysisConfig::default();
    info!(
        "Analysing {} classification codes from {}",
        config.target_codes.len(),
        config.data_dir.display()
    );

    let start = Instant::now();
    let mut analysis = EstablishmentAnalysis::new(config)
        .context("Failed to prepare the output directory")?;

    analysis
        .load_and_preprocess(&ESTABLISHMENT_COLUMNS)
        .context("Failed to load and preprocess establishment data")?;

    analysis.run_all().context("Failed to generate reports")?;

    info!(
        "Reports written to {} in {:?}",
        analysis.output_dir().display(),
        start.elapsed()
    );
    Ok(())
}
