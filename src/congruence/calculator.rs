//! Per-mode congruence between reference ranks and threshold clusterings.

use crate::config::AnalysisConfig;
use crate::data::{
    assignment_path, mode_dir, normalize_column_name, ClusterAssignments, LabelTable, ScoreRecord,
    ScoreTable, Threshold, Value,
};
use crate::error::Result;
use crate::metric::adjusted_rand_index;
use log::{debug, info, warn};
use std::borrow::Cow;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Rank labels that mark absent or unreliable ground truth (compared lower-cased).
pub const UNRELIABLE_LABELS: [&str; 2] = ["na", "unclassified"];

/// Result of scoring one coverage mode.
#[derive(Debug, Clone)]
pub enum ModeOutcome {
    /// Scores in rank-then-threshold order.
    Scored(ScoreTable),
    /// The mode's directory does not exist.
    NoData { mode_dir: PathBuf },
}

impl ModeOutcome {
    pub fn scores(&self) -> Option<&ScoreTable> {
        match self {
            ModeOutcome::Scored(table) => Some(table),
            ModeOutcome::NoData { .. } => None,
        }
    }

    pub fn into_scores(self) -> Option<ScoreTable> {
        match self {
            ModeOutcome::Scored(table) => Some(table),
            ModeOutcome::NoData { .. } => None,
        }
    }
}

/// ARI and number of valid rows for one (rank, threshold) column pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairScore {
    /// NaN when the pair is not scorable.
    pub ari: f64,
    /// Rows with both labels present and a reliable rank label.
    pub n_valid: usize,
}

/// Scores coverage modes against a shared, immutable reference table.
#[derive(Debug, Clone, Copy)]
pub struct CongruenceCalculator<'a> {
    reference: &'a LabelTable,
    config: &'a AnalysisConfig,
}

impl<'a> CongruenceCalculator<'a> {
    pub fn new(reference: &'a LabelTable, config: &'a AnalysisConfig) -> Self {
        Self { reference, config }
    }

    /// Score every configured rank and threshold for one coverage mode.
    ///
    /// A missing mode directory yields [`ModeOutcome::NoData`]; missing or
    /// unreadable threshold files only make that threshold's scores undefined.
    pub fn calculate_mode(&self, base_cluster_dir: &Path, mode: &str) -> Result<ModeOutcome> {
        info!("Analyzing Coverage Mode: {}", mode);

        let dir = mode_dir(base_cluster_dir, mode);
        if !dir.is_dir() {
            warn!("Directory not found for {}: {:?}. Skipping.", mode, dir);
            return Ok(ModeOutcome::NoData { mode_dir: dir });
        }

        let merged = merge_assignments(self.reference, &dir, &self.config.thresholds);
        debug!("Merged table for {}: {}", mode, merged.header().join(", "));
        let index = merged.column_index();

        let mut records = Vec::new();
        for rank in self.config.normalized_ranks() {
            let Some(rank_col) = index.original(&rank).and_then(|name| merged.column(name)) else {
                continue;
            };
            for threshold in &self.config.thresholds {
                let cluster_name = normalize_column_name(&threshold.column_name());
                let Some(cluster_col) =
                    index.original(&cluster_name).and_then(|name| merged.column(name))
                else {
                    continue;
                };

                let score = score_pair(rank_col.values(), cluster_col.values())?;
                debug!(
                    "{} {} @ {}: ARI={} (n={})",
                    mode, rank, threshold, score.ari, score.n_valid
                );
                records.push(ScoreRecord {
                    coverage_mode: mode.to_string(),
                    taxonomic_rank: capitalize(&rank),
                    aai_threshold: threshold.label().to_string(),
                    ari_score: score.ari,
                    n_sequences: score.n_valid,
                });
            }
        }

        Ok(ModeOutcome::Scored(ScoreTable::new(records)))
    }
}

/// Fold every threshold's assignments onto the reference table.
///
/// Each step returns a new table with one more `Cluster_ID_<t>` column, in
/// threshold order. Unloadable files contribute an all-missing column.
pub fn merge_assignments(
    reference: &LabelTable,
    mode_dir: &Path,
    thresholds: &[Threshold],
) -> LabelTable {
    thresholds
        .iter()
        .fold(reference.clone(), |table, threshold| {
            let name = threshold.column_name();
            match load_assignments(&assignment_path(mode_dir, threshold)) {
                Some(assignments) => table.left_join(&name, &assignments),
                None => table.with_missing_column(&name),
            }
        })
}

fn load_assignments(path: &Path) -> Option<ClusterAssignments> {
    if !path.is_file() {
        warn!("Cluster file not found: {:?}", path);
        return None;
    }
    match ClusterAssignments::from_tsv(path) {
        Ok(assignments) => Some(assignments),
        Err(e) => {
            warn!("Could not read cluster file {:?}: {}", path, e);
            None
        }
    }
}

/// Score one rank column against one cluster column.
///
/// Rows missing either label, or whose rank label is `na`/`unclassified`
/// (any case), are excluded. The ARI is computed only when more than one
/// row remains and both sides have more than one distinct label; otherwise
/// it is NaN.
pub fn score_pair(rank_labels: &[Value], cluster_labels: &[Value]) -> Result<PairScore> {
    let (truth, pred): (Vec<Cow<'_, str>>, Vec<Cow<'_, str>>) = rank_labels
        .iter()
        .zip(cluster_labels)
        .filter_map(|(rank, cluster)| Some((rank.key()?, cluster.key()?)))
        .filter(|(rank, _)| !is_unreliable(rank))
        .unzip();

    let n_valid = truth.len();
    let distinct_truth = truth.iter().collect::<HashSet<_>>().len();
    let distinct_pred = pred.iter().collect::<HashSet<_>>().len();

    let ari = if n_valid > 1 && distinct_truth > 1 && distinct_pred > 1 {
        adjusted_rand_index(&truth, &pred)?
    } else {
        f64::NAN
    };

    Ok(PairScore { ari, n_valid })
}

fn is_unreliable(label: &str) -> bool {
    let lower = label.to_lowercase();
    UNRELIABLE_LABELS.contains(&lower.as_str())
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;
    use std::fs;
    use tempfile::TempDir;

    fn cat(s: &str) -> Value {
        Value::Categorical(s.to_string())
    }

    fn cats(labels: &[&str]) -> Vec<Value> {
        labels.iter().map(|s| cat(s)).collect()
    }

    fn reference(ids: &[&str], genus: &[&str]) -> LabelTable {
        LabelTable::new(cats(ids), vec![Column::new("Genus", cats(genus))]).unwrap()
    }

    #[test]
    fn test_score_pair_identical() {
        let score = score_pair(&cats(&["g1", "g1", "g2", "g2"]), &cats(&["c1", "c1", "c2", "c2"]))
            .unwrap();
        assert_eq!(score.ari, 1.0);
        assert_eq!(score.n_valid, 4);
    }

    #[test]
    fn test_score_pair_no_rank_variability() {
        let score = score_pair(&cats(&["g1", "g1", "g1"]), &cats(&["c1", "c2", "c3"])).unwrap();
        assert!(score.ari.is_nan());
        assert_eq!(score.n_valid, 3);
    }

    #[test]
    fn test_score_pair_no_cluster_variability() {
        let score = score_pair(&cats(&["g1", "g2", "g3"]), &cats(&["c1", "c1", "c1"])).unwrap();
        assert!(score.ari.is_nan());
    }

    #[test]
    fn test_score_pair_filters_unreliable_and_missing() {
        let ranks = vec![cat("g1"), cat("g2"), cat("Unclassified"), cat("NA"), Value::Missing, cat("g1")];
        let clusters = vec![cat("c1"), cat("c2"), cat("c1"), cat("c2"), cat("c1"), Value::Missing];
        let score = score_pair(&ranks, &clusters).unwrap();
        assert_eq!(score.n_valid, 2);
        assert_eq!(score.ari, 1.0);
    }

    #[test]
    fn test_score_pair_all_missing_clusters() {
        let score = score_pair(&cats(&["g1", "g2"]), &[Value::Missing, Value::Missing]).unwrap();
        assert!(score.ari.is_nan());
        assert_eq!(score.n_valid, 0);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("genus"), "Genus");
        assert_eq!(capitalize("PHYLUM"), "Phylum");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_merge_assignments_is_a_fold() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("labels_id_0.90.tsv"), "A\tc1\nB\tc2\nZ\tc3\n").unwrap();
        let base = reference(&["A", "B"], &["g1", "g2"]);
        let thresholds = vec![Threshold::new(0.9).unwrap(), Threshold::new(0.5).unwrap()];

        let merged = merge_assignments(&base, dir.path(), &thresholds);
        assert_eq!(merged.column_names(), vec!["Genus", "Cluster_ID_0.90", "Cluster_ID_0.50"]);
        assert_eq!(merged.n_rows(), 2);
        assert_eq!(merged.column("Cluster_ID_0.50").unwrap().n_present(), 0);
        assert_eq!(base.column_names(), vec!["Genus"]);
    }

    #[test]
    fn test_calculate_mode_missing_dir() {
        let dir = TempDir::new().unwrap();
        let base = reference(&["A", "B"], &["g1", "g2"]);
        let config = AnalysisConfig::default();
        let outcome = CongruenceCalculator::new(&base, &config)
            .calculate_mode(dir.path(), "cov_short_80")
            .unwrap();
        assert!(matches!(outcome, ModeOutcome::NoData { .. }));
        assert!(outcome.scores().is_none());
    }

    #[test]
    fn test_calculate_mode_skips_absent_ranks() {
        let dir = TempDir::new().unwrap();
        let mode = dir.path().join("m");
        fs::create_dir(&mode).unwrap();
        fs::write(mode.join("labels_id_0.90.tsv"), "A\tc1\nB\tc1\nC\tc2\nD\tc2\n").unwrap();

        let base = reference(&["A", "B", "C", "D"], &["g1", "g1", "g2", "g2"]);
        let config = AnalysisConfig::new(&[0.9, 0.7], &["m"], &["genus", "family"]).unwrap();
        let outcome = CongruenceCalculator::new(&base, &config)
            .calculate_mode(dir.path(), "m")
            .unwrap();
        let scores = outcome.into_scores().unwrap();

        assert_eq!(scores.len(), 2);
        let genus_90 = scores.get("Genus", "0.90").unwrap();
        assert_eq!(genus_90.ari_score, 1.0);
        assert_eq!(genus_90.n_sequences, 4);
        let genus_70 = scores.get("Genus", "0.70").unwrap();
        assert!(genus_70.ari_score.is_nan());
        assert_eq!(genus_70.n_sequences, 0);
    }

    #[test]
    fn test_unreadable_file_scores_like_missing() {
        let dir = TempDir::new().unwrap();
        let mode = dir.path().join("m");
        fs::create_dir(&mode).unwrap();
        fs::write(mode.join("labels_id_0.90.tsv"), b"A\tc1\nB\t\xff\xfe\n").unwrap();
        fs::write(mode.join("labels_id_0.70.tsv"), "A\tc1\nB\tc2\n").unwrap();

        let base = reference(&["A", "B"], &["g1", "g2"]);
        let config = AnalysisConfig::new(&[0.9, 0.7], &["m"], &["genus"]).unwrap();
        let scores = CongruenceCalculator::new(&base, &config)
            .calculate_mode(dir.path(), "m")
            .unwrap()
            .into_scores()
            .unwrap();

        let genus_90 = scores.get("Genus", "0.90").unwrap();
        assert!(genus_90.ari_score.is_nan());
        assert_eq!(genus_90.n_sequences, 0);
        let genus_70 = scores.get("Genus", "0.70").unwrap();
        assert_eq!(genus_70.ari_score, 1.0);
        assert_eq!(genus_70.n_sequences, 2);
    }
}
