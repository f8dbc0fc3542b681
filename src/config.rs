//! Analysis configuration: thresholds, coverage modes and ranks to score.

use crate::data::Threshold;
use crate::error::{CongruenceError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Thresholds evaluated when none are configured.
pub const DEFAULT_THRESHOLDS: [f64; 4] = [0.90, 0.70, 0.50, 0.30];

/// Coverage modes evaluated when none are configured.
pub const DEFAULT_COVERAGE_MODES: [&str; 1] = ["cov_short_80"];

/// Ranks evaluated when none are configured.
pub const DEFAULT_RANKS: [&str; 4] = ["genus", "family", "order", "phylum"];

/// What to score: every (mode, rank, threshold) combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Clustering thresholds, in the order their columns are merged and reported.
    pub thresholds: Vec<Threshold>,
    /// Coverage mode subdirectories of the clustering results directory.
    pub coverage_modes: Vec<String>,
    /// Rank columns of the reference table, matched case-insensitively.
    pub ranks: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            thresholds: DEFAULT_THRESHOLDS
                .iter()
                .filter_map(|&t| Threshold::new(t).ok())
                .collect(),
            coverage_modes: DEFAULT_COVERAGE_MODES.iter().map(|s| s.to_string()).collect(),
            ranks: DEFAULT_RANKS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AnalysisConfig {
    /// Create a configuration from raw threshold values.
    pub fn new(thresholds: &[f64], coverage_modes: &[&str], ranks: &[&str]) -> Result<Self> {
        let config = Self {
            thresholds: thresholds
                .iter()
                .map(|&t| Threshold::new(t))
                .collect::<Result<Vec<_>>>()?,
            coverage_modes: coverage_modes.iter().map(|s| s.to_string()).collect(),
            ranks: ranks.iter().map(|s| s.to_string()).collect(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(CongruenceError::from)
    }

    /// Rank names normalized for column matching.
    pub fn normalized_ranks(&self) -> Vec<String> {
        self.ranks
            .iter()
            .map(|r| crate::data::normalize_column_name(r))
            .collect()
    }

    /// Check lists are non-empty and free of duplicates.
    pub fn validate(&self) -> Result<()> {
        if self.thresholds.is_empty() {
            return Err(CongruenceError::InvalidParameter(
                "At least one threshold is required".to_string(),
            ));
        }
        if self.coverage_modes.is_empty() {
            return Err(CongruenceError::InvalidParameter(
                "At least one coverage mode is required".to_string(),
            ));
        }
        if self.ranks.is_empty() {
            return Err(CongruenceError::InvalidParameter(
                "At least one rank is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for t in &self.thresholds {
            if !seen.insert(t.label()) {
                return Err(CongruenceError::InvalidParameter(format!(
                    "Duplicate threshold {}",
                    t
                )));
            }
        }
        check_unique("coverage mode", self.coverage_modes.iter().map(String::as_str))?;
        for mode in &self.coverage_modes {
            if mode.trim().is_empty() {
                return Err(CongruenceError::InvalidParameter(
                    "Coverage mode names must not be empty".to_string(),
                ));
            }
        }
        let ranks = self.normalized_ranks();
        check_unique("rank", ranks.iter().map(String::as_str))?;
        Ok(())
    }
}

fn check_unique<'a>(what: &str, names: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(CongruenceError::InvalidParameter(format!(
                "Duplicate {} '{}'",
                what, name
            )));
        }
    }
    Ok(())
}
