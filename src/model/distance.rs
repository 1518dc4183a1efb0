//! # Euclidean Distance
//!
//! Hot kernel of the distance-matrix phase, called N² times.
//! Accumulates squared differences eight lanes at a time, then a scalar tail.

use wide::f32x8;

/// Euclidean distance `sqrt(Σ (a_i - b_i)²)` between two equal-length vectors.
///
/// Lengths must match; the caller guarantees it by construction (every row of
/// a [`crate::data::SampleMatrix`] has the same size).
#[inline]
pub fn compute_distance(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    squared_distance(a, b).sqrt()
}

/// Sum of squared differences, without the final square root
#[inline]
pub fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    let n = a.len().min(b.len());
    let mut sum_vec = f32x8::splat(0.0);

    let mut k = 0;
    while k + 8 <= n {
        let mut a_arr = [0.0f32; 8];
        let mut b_arr = [0.0f32; 8];
        a_arr.copy_from_slice(&a[k..k + 8]);
        b_arr.copy_from_slice(&b[k..k + 8]);

        let diff = f32x8::from(a_arr) - f32x8::from(b_arr);
        sum_vec += diff * diff;
        k += 8;
    }

    let mut sum = sum_vec.reduce_add();

    // Scalar tail loop
    for i in k..n {
        let diff = a[i] - b[i];
        sum += diff * diff;
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar_reference(a: &[f32], b: &[f32]) -> f64 {
        a.iter()
            .zip(b)
            .map(|(&x, &y)| (x as f64 - y as f64).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    #[test]
    fn test_known_distances() {
        assert_eq!(compute_distance(&[0.0, 0.0], &[0.0, 1.0]), 1.0);
        assert_eq!(compute_distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        let d = compute_distance(&[0.0, 0.0], &[5.0, 5.0]);
        assert!((d - 50f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_self_distance_is_zero() {
        let v: Vec<f32> = (0..37).map(|i| i as f32 * 0.37 - 3.0).collect();
        assert_eq!(compute_distance(&v, &v), 0.0);
    }

    #[test]
    fn test_matches_scalar_across_tail_lengths() {
        for len in [1, 3, 7, 8, 9, 15, 16, 17, 64, 100] {
            let a: Vec<f32> = (0..len).map(|i| (i as f32).sin()).collect();
            let b: Vec<f32> = (0..len).map(|i| (i as f32 * 0.5).cos()).collect();
            let expected = scalar_reference(&a, &b);
            let got = compute_distance(&a, &b) as f64;
            assert!(
                (got - expected).abs() <= 1e-5 * expected.max(1.0),
                "len {}: {} vs {}",
                len,
                got,
                expected
            );
        }
    }

    #[test]
    fn test_symmetric() {
        let a: Vec<f32> = (0..21).map(|i| i as f32 * 1.5).collect();
        let b: Vec<f32> = (0..21).map(|i| 40.0 - i as f32).collect();
        let ab = compute_distance(&a, &b);
        let ba = compute_distance(&b, &a);
        assert!((ab - ba).abs() <= 1e-6 * ab);
    }
}
