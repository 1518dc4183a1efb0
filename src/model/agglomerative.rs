//! # Agglomerative Clustering
//!
//! Bottom-up average-linkage clustering over a precomputed distance matrix.
//!
//! Each of the N-1 iterations scans every unordered pair of active clusters
//! (`a < b`, in position order), merges the closest pair and records the
//! merge. Ties go to the first pair encountered because only a strictly
//! smaller linkage replaces the current best.

use crate::data::SampleMatrix;
use crate::error::{DendraError, Result};
use crate::model::cluster_store::ClusterStore;
use crate::model::dendrogram::{Dendrogram, MergeRecord};
use crate::model::distance_matrix::DistanceMatrix;
use crate::model::linkage::average_linkage;
use crate::model::Outcome;
use crate::utils::progress::{Clock, Phase, ProgressCallback, ProgressController, SystemClock};

/// Drives both phases of a clustering run through one progress controller
pub struct AgglomerativeClusterer<'a, C: Clock = SystemClock> {
    progress: ProgressController<'a, C>,
}

impl<'a, C: Clock> AgglomerativeClusterer<'a, C> {
    pub fn new(progress: ProgressController<'a, C>) -> Self {
        Self { progress }
    }

    /// Build the distance matrix, then run the merge loop.
    pub fn run(&mut self, samples: &SampleMatrix<'_>) -> Result<Outcome<Dendrogram>> {
        let _span = tracing::info_span!(
            "hierarchical_cluster",
            n_samples = samples.n_samples(),
            vector_size = samples.vector_size()
        )
        .entered();

        let distances = match DistanceMatrix::compute(samples, &mut self.progress)? {
            Outcome::Completed(distances) => distances,
            Outcome::Cancelled => return Ok(Outcome::Cancelled),
        };
        self.cluster(&distances)
    }

    /// Run the merge loop over an existing distance matrix.
    pub fn cluster(&mut self, distances: &DistanceMatrix) -> Result<Outcome<Dendrogram>> {
        let n = distances.n();
        let n_merges = n.saturating_sub(1);
        let _span = tracing::info_span!("merge_loop", n_samples = n).entered();

        let mut store = ClusterStore::new(n)?;
        let mut dendrogram = Dendrogram::with_capacity(n)?;

        for k in 0..n_merges {
            let n_active = store.len();
            debug_assert_eq!(n_active, n - k);

            let mut best = MergeRecord {
                height: f32::INFINITY,
                a: 0,
                b: 1,
            };
            for a in 0..n_active - 1 {
                if self
                    .progress
                    .tick(Phase::Merging, k as u64, n_merges as u64)
                    .is_break()
                {
                    tracing::debug!(iteration = k, "merge loop cancelled");
                    return Ok(Outcome::Cancelled);
                }

                let cluster_a = store.get(a);
                for b in (a + 1)..n_active {
                    let d = average_linkage(cluster_a, store.get(b), distances);
                    if d < best.height {
                        best = MergeRecord { height: d, a, b };
                    }
                }
            }

            tracing::trace!(
                iteration = k,
                a = best.a,
                b = best.b,
                height = best.height,
                "merge"
            );
            store.merge(best.a, best.b, best.height)?;
            dendrogram.push(best);
        }

        let root = store.into_root().ok_or_else(|| {
            DendraError::invalid_input(format!(
                "{} samples cannot be collapsed into a single cluster",
                n
            ))
        })?;
        debug_assert_eq!(root.len(), n);
        dendrogram.set_leaf_order(root.into_members());

        tracing::debug!(n_merges, "merge loop complete");
        Ok(Outcome::Completed(dendrogram))
    }
}

/// Cluster `samples` on the system clock with default polling intervals.
///
/// `callback` receives `(current, total)` progress signals (negative
/// `current` during the distance-matrix phase) and may return `false` on a
/// cancellation check to stop the run.
pub fn hierarchical_cluster(
    samples: &SampleMatrix<'_>,
    callback: Option<&mut dyn ProgressCallback>,
) -> Result<Outcome<Dendrogram>> {
    AgglomerativeClusterer::new(ProgressController::new(callback)).run(samples)
}
