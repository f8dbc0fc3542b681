//! Summary reporting for congruence scores.

mod summary;

pub use summary::{format_score, round_to, SummaryColumn, SummaryMatrix, SUMMARY_DECIMALS};
