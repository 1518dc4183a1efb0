//! # Model Module
//!
//! The clustering kernel.
//!
//! ## Core Algorithms
//! - `distance`: Euclidean distance between two feature vectors (SIMD)
//! - `distance_matrix`: Dense N×N table of pairwise distances
//! - `cluster_store`: Compacted list of active clusters
//! - `linkage`: Average-linkage distance between two clusters
//! - `agglomerative`: Closest-pair merge loop producing a `Dendrogram`
//!
//! ## Cost
//! The matrix costs O(N²·M). The merge loop rescans every active pair each
//! iteration: the summed cross-pair work per iteration is at most N²/2, so
//! the loop is O(N³) overall. There is no nearest-neighbor cache.

pub mod agglomerative;
pub mod cluster_store;
pub mod dendrogram;
pub mod distance;
pub mod distance_matrix;
pub mod linkage;

pub use agglomerative::{hierarchical_cluster, AgglomerativeClusterer};
pub use cluster_store::{Cluster, ClusterStore};
pub use dendrogram::{Dendrogram, LinkageRow, MergeRecord};
pub use distance::compute_distance;
pub use distance_matrix::{compute_distance_matrix, DistanceMatrix};
pub use linkage::{average_linkage, cluster_average_distance};

/// Result of a computation that the caller may stop early
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Completed(T),
    /// The progress callback asked to stop; no partial result exists
    Cancelled,
}

impl<T> Outcome<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }

    /// The completed value, if any
    pub fn completed(self) -> Option<T> {
        match self {
            Outcome::Completed(value) => Some(value),
            Outcome::Cancelled => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Completed(value) => Outcome::Completed(f(value)),
            Outcome::Cancelled => Outcome::Cancelled,
        }
    }
}
