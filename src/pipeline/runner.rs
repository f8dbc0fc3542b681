//! Pipeline runner: reference → per-mode congruence → summary.

use crate::config::AnalysisConfig;
use crate::congruence::{CongruenceCalculator, ModeOutcome};
use crate::data::{load_reference, LabelTable, ScoreTable};
use crate::error::Result;
use crate::report::SummaryMatrix;
use log::{info, warn};
use std::path::Path;

/// Outcome of a full run across all configured coverage modes.
#[derive(Debug, Clone)]
pub struct CongruenceRun {
    /// Score tables of modes that had data, in configured order.
    pub tables: Vec<ScoreTable>,
    /// Modes whose directory was missing.
    pub skipped_modes: Vec<String>,
}

impl CongruenceRun {
    /// All records in mode, rank, threshold order.
    pub fn records(&self) -> ScoreTable {
        ScoreTable::concat(&self.tables)
    }

    /// Pivot the collected scores. Fails when no mode produced data.
    pub fn summary(&self) -> Result<SummaryMatrix> {
        SummaryMatrix::from_tables(&self.tables)
    }
}

/// Congruence pipeline over a loaded reference table.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: AnalysisConfig,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl Pipeline {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Score every coverage mode against `reference`, sequentially and in order.
    ///
    /// Each mode merges onto its own copy of the reference, so one mode's
    /// missing files cannot affect another's scores.
    pub fn run(&self, reference: &LabelTable, base_cluster_dir: &Path) -> Result<CongruenceRun> {
        self.config.validate()?;
        let calculator = CongruenceCalculator::new(reference, &self.config);

        let mut tables = Vec::new();
        let mut skipped_modes = Vec::new();
        for mode in &self.config.coverage_modes {
            match calculator.calculate_mode(base_cluster_dir, mode)? {
                ModeOutcome::Scored(table) => tables.push(table),
                ModeOutcome::NoData { .. } => skipped_modes.push(mode.clone()),
            }
        }

        if !skipped_modes.is_empty() {
            warn!(
                "{} of {} coverage modes had no data: {}",
                skipped_modes.len(),
                self.config.coverage_modes.len(),
                skipped_modes.join(", ")
            );
        }
        Ok(CongruenceRun {
            tables,
            skipped_modes,
        })
    }
}

/// Load the reference table and score every configured mode.
pub fn run_congruence<P: AsRef<Path>, Q: AsRef<Path>>(
    taxonomy: P,
    base_cluster_dir: Q,
    config: &AnalysisConfig,
) -> Result<CongruenceRun> {
    info!("--- Starting ARI Congruence Analysis ---");
    let reference = load_reference(taxonomy)?;
    Pipeline::new(config.clone()).run(&reference, base_cluster_dir.as_ref())
}

/// Run the full analysis and write the summary matrix to `output`.
///
/// Nothing is written when the taxonomy cannot be read or no mode has data.
pub fn run_to_file(
    taxonomy: &Path,
    base_cluster_dir: &Path,
    output: &Path,
    config: &AnalysisConfig,
) -> Result<(CongruenceRun, SummaryMatrix)> {
    let run = run_congruence(taxonomy, base_cluster_dir, config)?;
    let summary = run.summary()?;
    summary.to_tsv(output)?;
    info!(
        "Results saved to: {} ({} ranks x {} columns)",
        output.display(),
        summary.n_ranks(),
        summary.n_columns()
    );
    Ok((run, summary))
}
