//! Similarity thresholds identified by their two-decimal label.

use crate::error::{CongruenceError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A clustering similarity threshold.
///
/// Identity, ordering and hashing use the canonical `X.XX` label, so the
/// file looked up and the column reported always agree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Threshold {
    value: f64,
    label: String,
}

impl Threshold {
    /// Create a threshold from a fraction in [0, 1].
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(CongruenceError::InvalidParameter(format!(
                "Threshold must be between 0 and 1, got {}",
                value
            )));
        }
        Ok(Self {
            value,
            label: format!("{:.2}", value),
        })
    }

    /// The value as supplied.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Canonical two-decimal label, e.g. `0.90`.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Name of the cluster label file for this threshold.
    pub fn file_name(&self) -> String {
        format!("labels_id_{}.tsv", self.label)
    }

    /// Name of the merged-table column holding this threshold's cluster labels.
    pub fn column_name(&self) -> String {
        format!("Cluster_ID_{}", self.label)
    }
}

impl TryFrom<f64> for Threshold {
    type Error = CongruenceError;

    fn try_from(value: f64) -> Result<Self> {
        Threshold::new(value)
    }
}

impl From<Threshold> for f64 {
    fn from(threshold: Threshold) -> Self {
        threshold.value
    }
}

impl PartialEq for Threshold {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
    }
}

impl Eq for Threshold {}

impl Hash for Threshold {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.label.hash(state);
    }
}

impl PartialOrd for Threshold {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Threshold {
    fn cmp(&self, other: &Self) -> Ordering {
        self.label.cmp(&other.label)
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}
