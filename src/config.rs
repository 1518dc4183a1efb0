//! # Configuration Logic
//!
//! ## Role
//! CLI argument parsing and validation for the `dendra` binary.
//!
//! ## Validation
//! - Ensure the input file exists
//! - Ensure both polling intervals are positive
//! - Ensure the progress interval does not exceed the cancel interval
//!
//! ## Example CLI
//! ```bash
//! dendra --input features.tsv --out tree.json --max-runtime-secs 600
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::error::{DendraError, Result};
use crate::io::{Delimiter, OutputFormat, ReadOptions};
use crate::utils::progress::ProgressIntervals;
use crate::utils::telemetry::ConsoleConfig;

/// Field separator as given on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DelimiterArg {
    /// `.csv` means comma, anything else whitespace
    Auto,
    Whitespace,
    Comma,
}

/// Average-linkage hierarchical clustering of feature vectors
#[derive(Parser, Debug, Clone)]
#[command(name = "dendra", version, about)]
pub struct Config {
    /// Input file: one sample per line
    #[arg(long, short = 'i')]
    pub input: PathBuf,

    /// Output file (stdout when omitted)
    #[arg(long, short = 'o')]
    pub out: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Field separator
    #[arg(long, value_enum, default_value_t = DelimiterArg::Auto)]
    pub delimiter: DelimiterArg,

    /// Skip the first non-comment line
    #[arg(long)]
    pub header: bool,

    /// First column holds sample labels
    #[arg(long)]
    pub labels: bool,

    /// Minimum spacing of progress reports in milliseconds
    #[arg(long, default_value_t = 100)]
    pub progress_interval_ms: u64,

    /// Minimum spacing of cancellation checks in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub cancel_interval_ms: u64,

    /// Cancel the run once this many seconds have elapsed
    #[arg(long)]
    pub max_runtime_secs: Option<u64>,

    /// Suppress progress output
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl Config {
    /// Parse from the process arguments and validate
    pub fn parse_and_validate() -> Result<Self> {
        Self::parse().validate()
    }

    /// Check cross-field constraints
    pub fn validate(self) -> Result<Self> {
        if !self.input.exists() {
            return Err(DendraError::config(format!(
                "input file not found: {}",
                self.input.display()
            )));
        }
        if self.progress_interval_ms == 0 || self.cancel_interval_ms == 0 {
            return Err(DendraError::config("polling intervals must be positive"));
        }
        if self.progress_interval_ms > self.cancel_interval_ms {
            return Err(DendraError::config(format!(
                "progress interval ({}ms) exceeds cancel interval ({}ms)",
                self.progress_interval_ms, self.cancel_interval_ms
            )));
        }
        Ok(self)
    }

    pub fn read_options(&self) -> ReadOptions {
        let delimiter = match self.delimiter {
            DelimiterArg::Auto => Delimiter::from_path(&self.input),
            DelimiterArg::Whitespace => Delimiter::Whitespace,
            DelimiterArg::Comma => Delimiter::Comma,
        };
        ReadOptions {
            delimiter,
            has_header: self.header,
            has_labels: self.labels,
        }
    }

    pub fn intervals(&self) -> ProgressIntervals {
        ProgressIntervals {
            progress: Duration::from_millis(self.progress_interval_ms),
            cancel: Duration::from_millis(self.cancel_interval_ms),
        }
    }

    pub fn console(&self) -> ConsoleConfig {
        ConsoleConfig {
            quiet: self.quiet,
            max_runtime: self.max_runtime_secs.map(Duration::from_secs),
        }
    }
}
