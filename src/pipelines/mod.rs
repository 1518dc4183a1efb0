//! # Pipelines Module
//!
//! High-level orchestration for the command-line binary.

pub mod clustering;

pub use clustering::ClusteringPipeline;
