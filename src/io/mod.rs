//! # I/O Module
//!
//! Sample input and dendrogram output for the command-line host.

pub mod delimited;
pub mod output;

pub use delimited::{parse_samples, read_samples, Delimiter, ReadOptions, SampleTable};
pub use output::{write_dendrogram, OutputFormat};
