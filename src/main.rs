//! # Dendra: Average-Linkage Hierarchical Clustering
//!
//! ## Usage
//! ```bash
//! # JSON result on stdout
//! dendra --input features.tsv
//!
//! # Labelled CSV to Newick, give up after ten minutes
//! dendra --input features.csv --labels --format newick --out tree.nwk --max-runtime-secs 600
//! ```
//!
//! Exit status: 0 on success, 1 on error, 2 when the run was cancelled.

use std::process::ExitCode;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use dendra::config::Config;
use dendra::pipelines::ClusteringPipeline;
use dendra::Outcome;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(Outcome::Completed(())) => ExitCode::SUCCESS,
        Ok(Outcome::Cancelled) => {
            eprintln!("Cancelled: no result written");
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<Outcome<()>> {
    let config = Config::parse_and_validate().context("Invalid arguments")?;
    let input = config.input.clone();

    let mut pipeline = ClusteringPipeline::new(config);
    let outcome = pipeline
        .run()
        .with_context(|| format!("Failed to cluster {}", input.display()))?;
    Ok(outcome)
}
