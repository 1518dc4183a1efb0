//! # Dendra Library Root
//!
//! ## Role
//! Average-linkage agglomerative clustering as an embeddable kernel: a host
//! hands over N feature vectors and gets back a merge sequence and a leaf
//! order, with optional progress reporting and cooperative cancellation.
//!
//! ## Module Structure
//! ```text
//! dendra
//! ├── data        # SampleIdx, validated SampleMatrix view
//! ├── model       # Distance, distance matrix, cluster store, linkage, merge loop
//! ├── io          # Delimited sample reader, dendrogram writers
//! ├── pipelines   # Command-line orchestration
//! └── utils       # Progress protocol, console telemetry
//! ```
//!
//! ## Example
//! ```
//! use dendra::{hierarchical_cluster, SampleMatrix};
//!
//! let data = [0.0, 0.0, 0.0, 1.0, 5.0, 5.0];
//! let samples = SampleMatrix::new(&data, 3, 2).unwrap();
//! let dendrogram = hierarchical_cluster(&samples, None)
//!     .unwrap()
//!     .completed()
//!     .unwrap();
//! assert_eq!(dendrogram.heights()[0], 1.0);
//! assert_eq!(dendrogram.merge_a(), &[0, 0]);
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod io;
pub mod model;
pub mod pipelines;
pub mod utils;

pub use data::{SampleIdx, SampleMatrix};
pub use error::{DendraError, Result};
pub use model::{
    cluster_average_distance, compute_distance, compute_distance_matrix, hierarchical_cluster,
    AgglomerativeClusterer, Dendrogram, DistanceMatrix, MergeRecord, Outcome,
};
pub use utils::progress::{
    Clock, Phase, ProgressCallback, ProgressController, ProgressEvent, ProgressIntervals,
    SteppingClock, SystemClock,
};
