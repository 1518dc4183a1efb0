//! # Pairwise Distance Matrix
//!
//! Dense N×N table of Euclidean distances, built once and read-only afterwards.
//!
//! Every ordered pair `(i, j)` is evaluated on its own, including `i == j`
//! and both `(i, j)` and `(j, i)`. Nothing is mirrored, so the table is
//! symmetric up to floating-point evaluation order only.

use std::ops::ControlFlow;

use crate::data::{SampleIdx, SampleMatrix};
use crate::error::{try_reserve_exact, DendraError, Result};
use crate::model::distance::compute_distance;
use crate::model::Outcome;
use crate::utils::progress::{Clock, Phase, ProgressController};

/// Row-major N×N distance table
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    values: Vec<f32>,
    n: usize,
}

impl DistanceMatrix {
    /// Build the matrix, polling `progress` once per row.
    ///
    /// Returns [`Outcome::Cancelled`] (with the partial table already
    /// dropped) if the callback asks to stop.
    pub fn compute<C: Clock>(
        samples: &SampleMatrix<'_>,
        progress: &mut ProgressController<'_, C>,
    ) -> Result<Outcome<Self>> {
        let n = samples.n_samples();
        let _span = tracing::info_span!("distance_matrix", n_samples = n).entered();

        let len = n
            .checked_mul(n)
            .ok_or_else(|| DendraError::allocation("distance matrix", usize::MAX))?;
        let mut values = Vec::new();
        try_reserve_exact(&mut values, len, "distance matrix")?;

        for (i, vec_a) in samples.rows().enumerate() {
            if let ControlFlow::Break(()) = progress.tick(Phase::DistanceMatrix, i as u64, n as u64)
            {
                tracing::debug!(row = i, "distance matrix cancelled");
                return Ok(Outcome::Cancelled);
            }
            values.extend(samples.rows().map(|vec_b| compute_distance(vec_a, vec_b)));
        }

        tracing::debug!(n_samples = n, "distance matrix complete");
        Ok(Outcome::Completed(Self { values, n }))
    }

    /// Number of samples (matrix side length)
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Distance from sample `i` to sample `j`
    #[inline]
    pub fn get(&self, i: SampleIdx, j: SampleIdx) -> f32 {
        self.values[i.as_usize() * self.n + j.as_usize()]
    }

    /// All distances from sample `i`
    #[inline]
    pub fn row(&self, i: SampleIdx) -> &[f32] {
        let start = i.as_usize() * self.n;
        &self.values[start..start + self.n]
    }

    /// The flat row-major table
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }
}

/// Build the distance matrix with no progress callback.
pub fn compute_distance_matrix(samples: &SampleMatrix<'_>) -> Result<DistanceMatrix> {
    match DistanceMatrix::compute(samples, &mut ProgressController::disabled())? {
        Outcome::Completed(matrix) => Ok(matrix),
        // A disabled controller never breaks
        Outcome::Cancelled => unreachable!("cancelled without a progress callback"),
    }
}
