//! Pipeline composition and execution for congruence analysis.

mod runner;

pub use runner::{run_congruence, run_to_file, CongruenceRun, Pipeline};
