//! Congruence score records.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// ARI score for one (coverage mode, rank, threshold) combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Coverage mode the clustering was run with.
    pub coverage_mode: String,
    /// Capitalized rank name, e.g. `Genus`.
    pub taxonomic_rank: String,
    /// Threshold label, e.g. `0.90`.
    pub aai_threshold: String,
    /// Adjusted Rand Index; NaN when undefined.
    pub ari_score: f64,
    /// Number of valid rows used.
    pub n_sequences: usize,
}

impl ScoreRecord {
    /// Whether a score was computed.
    pub fn is_defined(&self) -> bool {
        !self.ari_score.is_nan()
    }
}

/// Score records for one coverage mode, in rank-then-threshold order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreTable {
    pub records: Vec<ScoreRecord>,
}

impl ScoreTable {
    pub fn new(records: Vec<ScoreRecord>) -> Self {
        Self { records }
    }

    /// Concatenate several tables, keeping their order.
    pub fn concat<'a>(tables: impl IntoIterator<Item = &'a ScoreTable>) -> Self {
        Self {
            records: tables
                .into_iter()
                .flat_map(|t| t.records.iter().cloned())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoreRecord> {
        self.records.iter()
    }

    /// Records with a defined score.
    pub fn defined(&self) -> Vec<&ScoreRecord> {
        self.records.iter().filter(|r| r.is_defined()).collect()
    }

    /// Find the record for a rank and threshold label.
    pub fn get(&self, rank: &str, threshold: &str) -> Option<&ScoreRecord> {
        self.records
            .iter()
            .find(|r| r.taxonomic_rank == rank && r.aai_threshold == threshold)
    }

    /// Write the long-form records to a TSV file.
    ///
    /// Undefined scores are written as `NaN`.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writeln!(
            writer,
            "Coverage_Mode\tTaxonomic_Rank\tAAI_Threshold\tARI_Score\tN_Sequences"
        )?;
        for r in &self.records {
            writeln!(
                writer,
                "{}\t{}\t{}\t{}\t{}",
                r.coverage_mode, r.taxonomic_rank, r.aai_threshold, r.ari_score, r.n_sequences
            )?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Write the records as pretty-printed JSON.
    ///
    /// JSON has no NaN, so undefined scores become `null`.
    pub fn to_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn record(rank: &str, threshold: &str, score: f64, n: usize) -> ScoreRecord {
        ScoreRecord {
            coverage_mode: "cov_short_80".to_string(),
            taxonomic_rank: rank.to_string(),
            aai_threshold: threshold.to_string(),
            ari_score: score,
            n_sequences: n,
        }
    }

    #[test]
    fn test_defined_and_lookup() {
        let table = ScoreTable::new(vec![
            record("Genus", "0.90", 1.0, 4),
            record("Genus", "0.70", f64::NAN, 0),
        ]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.defined().len(), 1);
        assert_eq!(table.get("Genus", "0.70").unwrap().n_sequences, 0);
        assert!(table.get("Family", "0.70").is_none());
    }

    #[test]
    fn test_concat_keeps_order() {
        let a = ScoreTable::new(vec![record("Genus", "0.90", 1.0, 4)]);
        let b = ScoreTable::new(vec![record("Family", "0.90", 0.5, 4)]);
        let all = ScoreTable::concat([&a, &b]);
        assert_eq!(all.records[0].taxonomic_rank, "Genus");
        assert_eq!(all.records[1].taxonomic_rank, "Family");
    }

    #[test]
    fn test_to_tsv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.tsv");
        let table = ScoreTable::new(vec![
            record("Genus", "0.90", 1.0, 4),
            record("Genus", "0.70", f64::NAN, 0),
        ]);
        table.to_tsv(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "cov_short_80\tGenus\t0.90\t1\t4");
        assert_eq!(lines[2], "cov_short_80\tGenus\t0.70\tNaN\t0");
    }

    #[test]
    fn test_to_json_writes_null_for_undefined() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.json");
        let table = ScoreTable::new(vec![record("Genus", "0.70", f64::NAN, 0)]);
        table.to_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(value["records"][0]["ari_score"].is_null());
    }
}
