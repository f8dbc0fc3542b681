//! Cluster Congruence Library
//!
//! Measures how well threshold-based clusterings recover a formal
//! classification (e.g. ICTV taxonomic ranks) using the Adjusted Rand Index.
//!
//! # Overview
//!
//! - **data**: Label tables, identifier normalization, loaders, score records
//! - **metric**: Partition similarity (Adjusted Rand Index)
//! - **congruence**: Per-coverage-mode merging, filtering and scoring
//! - **report**: Rank × (mode, threshold) summary matrix
//! - **config**: Thresholds, coverage modes and ranks to evaluate
//! - **pipeline**: End-to-end execution
//!
//! # Example
//!
//! ```no_run
//! use cluster_congruence::prelude::*;
//!
//! let config = AnalysisConfig::default();
//! let run = run_congruence("taxonomy.tsv", "mmseqs_clusters/", &config).unwrap();
//! let summary = run.summary().unwrap();
//! summary.to_tsv("ari_results.tsv").unwrap();
//! println!("{}", summary);
//! ```

pub mod config;
pub mod congruence;
pub mod data;
pub mod error;
pub mod metric;
pub mod pipeline;
pub mod report;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::config::AnalysisConfig;
    pub use crate::congruence::{score_pair, CongruenceCalculator, ModeOutcome, PairScore};
    pub use crate::data::{
        load_reference, normalize_id, ClusterAssignments, Column, LabelTable, ScoreRecord,
        ScoreTable, Threshold, Value,
    };
    pub use crate::error::{CongruenceError, Result};
    pub use crate::metric::adjusted_rand_index;
    pub use crate::pipeline::{run_congruence, run_to_file, CongruenceRun, Pipeline};
    pub use crate::report::{SummaryColumn, SummaryMatrix};
}
