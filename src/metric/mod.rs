//! Partition similarity metrics.

pub mod ari;

pub use ari::{adjusted_rand_index, pair_confusion, PairConfusion};
