//! # Sample Definitions
//!
//! Sample index type and the validated N×M feature matrix the kernel consumes.

use serde::Serialize;

use crate::error::{DendraError, Result};

/// Zero-cost newtype for sample indices
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub struct SampleIdx(pub u32);

impl SampleIdx {
    pub fn new(idx: u32) -> Self {
        Self(idx)
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for SampleIdx {
    fn from(idx: u32) -> Self {
        Self(idx)
    }
}

impl From<usize> for SampleIdx {
    fn from(idx: usize) -> Self {
        Self(idx as u32)
    }
}

impl From<SampleIdx> for usize {
    fn from(idx: SampleIdx) -> usize {
        idx.0 as usize
    }
}

/// Row-major view over `n_samples` feature vectors of `vector_size` values each.
///
/// Construction validates the shape up front so the kernel never has to:
/// at least two samples, non-empty vectors, a buffer of exactly
/// `n_samples * vector_size` values, all finite.
#[derive(Clone, Copy, Debug)]
pub struct SampleMatrix<'a> {
    data: &'a [f32],
    n_samples: usize,
    vector_size: usize,
}

impl<'a> SampleMatrix<'a> {
    /// Wrap a flat row-major buffer.
    pub fn new(data: &'a [f32], n_samples: usize, vector_size: usize) -> Result<Self> {
        if n_samples < 2 {
            return Err(DendraError::invalid_input(format!(
                "need at least 2 samples, got {}",
                n_samples
            )));
        }
        if vector_size == 0 {
            return Err(DendraError::invalid_input("vector size must be positive"));
        }
        let expected = n_samples.checked_mul(vector_size).ok_or_else(|| {
            DendraError::invalid_input(format!(
                "{} samples of size {} overflow the address space",
                n_samples, vector_size
            ))
        })?;
        if n_samples > u32::MAX as usize {
            return Err(DendraError::invalid_input(format!(
                "{} samples exceed the supported maximum of {}",
                n_samples,
                u32::MAX
            )));
        }
        if data.len() != expected {
            return Err(DendraError::invalid_input(format!(
                "expected {} values ({} samples x {}), got {}",
                expected,
                n_samples,
                vector_size,
                data.len()
            )));
        }
        if let Some(pos) = data.iter().position(|v| !v.is_finite()) {
            return Err(DendraError::invalid_input(format!(
                "non-finite value {} in sample {} at feature {}",
                data[pos],
                pos / vector_size,
                pos % vector_size
            )));
        }

        Ok(Self {
            data,
            n_samples,
            vector_size,
        })
    }

    /// Number of samples (N)
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Length of every feature vector (M)
    #[inline]
    pub fn vector_size(&self) -> usize {
        self.vector_size
    }

    /// Feature vector of one sample
    #[inline]
    pub fn row(&self, idx: SampleIdx) -> &'a [f32] {
        let start = idx.as_usize() * self.vector_size;
        &self.data[start..start + self.vector_size]
    }

    /// Iterate over all feature vectors in sample order
    pub fn rows(&self) -> impl Iterator<Item = &'a [f32]> + 'a {
        self.data.chunks_exact(self.vector_size)
    }

    /// The underlying flat buffer
    pub fn as_flat(&self) -> &'a [f32] {
        self.data
    }
}

/// Flatten equal-length rows into a row-major buffer, rejecting ragged input.
///
/// Returns the buffer and the shared vector size.
pub fn flatten_rows<R: AsRef<[f32]>>(rows: &[R]) -> Result<(Vec<f32>, usize)> {
    let vector_size = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
    if let Some((i, row)) = rows
        .iter()
        .enumerate()
        .find(|(_, r)| r.as_ref().len() != vector_size)
    {
        return Err(DendraError::invalid_input(format!(
            "ragged samples: sample {} has {} values, sample 0 has {}",
            i,
            row.as_ref().len(),
            vector_size
        )));
    }

    let mut flat = Vec::new();
    crate::error::try_reserve_exact(&mut flat, rows.len() * vector_size, "sample buffer")?;
    for row in rows {
        flat.extend_from_slice(row.as_ref());
    }
    Ok((flat, vector_size))
}
