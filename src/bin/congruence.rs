//! congruence - ARI congruence between a taxonomy and threshold clusterings
//!
//! Command-line interface for scoring clustering results against a reference
//! classification.

use clap::Parser;
use cluster_congruence::config::AnalysisConfig;
use cluster_congruence::error::Result;
use cluster_congruence::pipeline::run_to_file;
use log::info;
use std::path::{Path, PathBuf};

/// Calculate the Adjusted Rand Index (ARI) between taxonomic ranks and
/// clustering results at several similarity thresholds.
#[derive(Parser)]
#[command(name = "congruence")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the taxonomy reference TSV (identifier, Genus, Family, ...)
    #[arg(short, long)]
    taxonomy: PathBuf,

    /// Directory with one subdirectory of labels_id_<t>.tsv files per coverage mode
    #[arg(short = 'c', long)]
    base_cluster_dir: PathBuf,

    /// Output path for the ARI summary TSV
    #[arg(short, long)]
    output: PathBuf,

    /// YAML file overriding thresholds, coverage modes and ranks
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also write every score record (JSON if the extension is .json, else TSV)
    #[arg(long)]
    records: Option<PathBuf>,
}

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    let cli = Cli::parse();

    if let Err(e) = cmd_run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => {
            info!("Loading analysis configuration from {:?}...", path);
            AnalysisConfig::from_yaml_file(path)?
        }
        None => AnalysisConfig::default(),
    };

    let (run, summary) = run_to_file(&cli.taxonomy, &cli.base_cluster_dir, &cli.output, &config)?;

    println!("\n--- ARI Summary Matrix ---");
    print!("{}", summary);
    println!("\nResults saved to: {}", cli.output.display());

    if let Some(path) = &cli.records {
        write_records(&run.records(), path)?;
        info!("Score records saved to: {}", path.display());
    }
    Ok(())
}

fn write_records(records: &cluster_congruence::data::ScoreTable, path: &Path) -> Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => records.to_json(path),
        _ => records.to_tsv(path),
    }
}
