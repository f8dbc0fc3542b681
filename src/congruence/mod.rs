//! Congruence between a reference classification and clustering results.

mod calculator;

pub use calculator::{
    capitalize, merge_assignments, score_pair, CongruenceCalculator, ModeOutcome, PairScore,
    UNRELIABLE_LABELS,
};
