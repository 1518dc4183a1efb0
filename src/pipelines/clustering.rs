//! # Clustering Pipeline
//!
//! Orchestrates a command-line run: read samples, cluster them with console
//! progress, write the dendrogram.

use std::fs::File;
use std::io::{self, BufWriter};
use std::time::Instant;

use tracing::{info, instrument};

use crate::config::Config;
use crate::error::Result;
use crate::io::{read_samples, write_dendrogram};
use crate::model::{AgglomerativeClusterer, Outcome};
use crate::utils::progress::{ProgressCallback, ProgressController, SystemClock};
use crate::utils::telemetry::ConsoleProgress;

/// Clustering pipeline
pub struct ClusteringPipeline {
    config: Config,
}

impl ClusteringPipeline {
    /// Create a new clustering pipeline
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the pipeline. `Cancelled` means nothing was written.
    #[instrument(skip(self), fields(input = %self.config.input.display()))]
    pub fn run(&mut self) -> Result<Outcome<()>> {
        let start = Instant::now();

        let table = read_samples(&self.config.input, &self.config.read_options())?;
        let samples = table.matrix()?;
        info!(
            n_samples = samples.n_samples(),
            vector_size = samples.vector_size(),
            "loaded samples"
        );

        let mut console = ConsoleProgress::new(self.config.console());
        let outcome = {
            let callback: &mut dyn ProgressCallback = &mut console;
            let progress =
                ProgressController::with_clock(Some(callback), SystemClock::new(), self.config.intervals());
            AgglomerativeClusterer::new(progress).run(&samples)?
        };
        console.finish();

        let dendrogram = match outcome {
            Outcome::Completed(dendrogram) => dendrogram,
            Outcome::Cancelled => {
                if console.deadline_hit() {
                    info!(
                        elapsed_secs = start.elapsed().as_secs_f64(),
                        "runtime limit reached, clustering cancelled"
                    );
                } else {
                    info!("clustering cancelled");
                }
                return Ok(Outcome::Cancelled);
            }
        };

        let labels = table.labels.as_deref();
        match &self.config.out {
            Some(path) => {
                let writer = BufWriter::new(File::create(path)?);
                write_dendrogram(writer, &dendrogram, self.config.format, labels)?;
            }
            None => {
                let stdout = io::stdout();
                write_dendrogram(stdout.lock(), &dendrogram, self.config.format, labels)?;
            }
        }

        info!(
            n_merges = dendrogram.n_merges(),
            elapsed_secs = start.elapsed().as_secs_f64(),
            "clustering complete"
        );
        Ok(Outcome::Completed(()))
    }
}
