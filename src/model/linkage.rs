//! # Average Linkage
//!
//! Cluster-to-cluster distance as the mean of all cross-pair sample distances.

use crate::data::SampleIdx;
use crate::model::cluster_store::Cluster;
use crate::model::distance_matrix::DistanceMatrix;

/// Mean of `distance(i, j)` over all `i` in `set_a`, `j` in `set_b`.
///
/// Reads rows of `set_a` from the precomputed matrix; O(|A|·|B|).
/// Both sets must be non-empty.
#[inline]
pub fn cluster_average_distance(
    set_a: &[SampleIdx],
    set_b: &[SampleIdx],
    distances: &DistanceMatrix,
) -> f32 {
    debug_assert!(!set_a.is_empty() && !set_b.is_empty());

    let mut total = 0.0f32;
    for &i in set_a {
        let row = distances.row(i);
        for &j in set_b {
            total += row[j.as_usize()];
        }
    }
    total / (set_a.len() * set_b.len()) as f32
}

/// [`cluster_average_distance`] over two clusters
#[inline]
pub fn average_linkage(a: &Cluster, b: &Cluster, distances: &DistanceMatrix) -> f32 {
    cluster_average_distance(a.members(), b.members(), distances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SampleMatrix;
    use crate::model::distance_matrix::compute_distance_matrix;

    fn s(v: &[u32]) -> Vec<SampleIdx> {
        v.iter().copied().map(SampleIdx).collect()
    }

    #[test]
    fn test_singletons_match_matrix() {
        let data = [0.0, 0.0, 0.0, 1.0, 5.0, 5.0];
        let samples = SampleMatrix::new(&data, 3, 2).unwrap();
        let matrix = compute_distance_matrix(&samples).unwrap();

        let d = cluster_average_distance(&s(&[0]), &s(&[2]), &matrix);
        assert_eq!(d, matrix.get(SampleIdx(0), SampleIdx(2)));
    }

    #[test]
    fn test_mean_of_cross_pairs() {
        let data = [0.0, 0.0, 0.0, 1.0, 5.0, 5.0];
        let samples = SampleMatrix::new(&data, 3, 2).unwrap();
        let matrix = compute_distance_matrix(&samples).unwrap();

        let d = cluster_average_distance(&s(&[0, 1]), &s(&[2]), &matrix);
        let expected = (50f32.sqrt() + 41f32.sqrt()) / 2.0;
        assert!((d - expected).abs() < 1e-5);

        // Same value with the arguments swapped
        let swapped = cluster_average_distance(&s(&[2]), &s(&[0, 1]), &matrix);
        assert!((d - swapped).abs() < 1e-5);
    }

    #[test]
    fn test_four_point_square() {
        // Unit square corners: 0=(0,0) 1=(1,0) 2=(0,1) 3=(1,1)
        let data = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let samples = SampleMatrix::new(&data, 4, 2).unwrap();
        let matrix = compute_distance_matrix(&samples).unwrap();

        // {0,1} vs {2,3}: two vertical edges of 1, two diagonals of sqrt(2)
        let d = cluster_average_distance(&s(&[0, 1]), &s(&[2, 3]), &matrix);
        let expected = (2.0 + 2.0 * 2f32.sqrt()) / 4.0;
        assert!((d - expected).abs() < 1e-6);
    }
}
