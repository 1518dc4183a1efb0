//! # Data Module
//!
//! In-memory representation of the samples being clustered.
//!
//! - **Zero-cost newtypes:** `SampleIdx` keeps sample indices apart from
//!   cluster positions, which shift as clusters merge.
//! - **Borrowed, flat storage:** `SampleMatrix` is a validated view over a
//!   caller-owned row-major buffer; the kernel never copies the features.

pub mod sample;

pub use sample::{flatten_rows, SampleIdx, SampleMatrix};
