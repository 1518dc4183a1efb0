//! # Active Cluster Store
//!
//! Dense, position-indexed list of the clusters still alive during the
//! merge loop. It starts with one singleton per sample and shrinks by one
//! per merge.
//!
//! ## Invariants
//! - Exactly `len()` entries, compacted, no gaps. Positions are what the
//!   merge records refer to, so they shift whenever an earlier entry is removed.
//! - The member lists of all active clusters partition `0..N`.
//! - `members()[0]` is the smallest sample index of every cluster.
//!
//! ## Merge step
//! 1. Remove the higher position `b` (positions below it are unaffected).
//! 2. Remove the lower position `a`.
//! 3. Append the merged cluster at the end.
//!
//! Removing `a` first would shift `b` down by one.

use crate::data::SampleIdx;
use crate::error::{try_reserve_exact, DendraError, Result};

/// A node of the merge tree
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    members: Vec<SampleIdx>,
    height: f32,
    /// Store positions `(a, b)` the children occupied when this cluster was formed
    children: Option<(usize, usize)>,
}

impl Cluster {
    /// Leaf cluster holding a single sample
    pub fn singleton(sample: SampleIdx) -> Self {
        Self {
            members: vec![sample],
            height: 0.0,
            children: None,
        }
    }

    /// Sample indices in concatenation order
    #[inline]
    pub fn members(&self) -> &[SampleIdx] {
        &self.members
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Linkage distance at creation (0 for singletons)
    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn children(&self) -> Option<(usize, usize)> {
        self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn into_members(self) -> Vec<SampleIdx> {
        self.members
    }
}

/// Working set of active clusters
#[derive(Debug, Clone)]
pub struct ClusterStore {
    clusters: Vec<Cluster>,
}

impl ClusterStore {
    /// One singleton per sample, in sample order
    pub fn new(n_samples: usize) -> Result<Self> {
        let mut clusters = Vec::new();
        try_reserve_exact(&mut clusters, n_samples, "cluster store")?;
        clusters.extend((0..n_samples).map(|s| Cluster::singleton(SampleIdx::from(s))));
        Ok(Self { clusters })
    }

    /// Number of active clusters
    #[inline]
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Cluster at a position
    #[inline]
    pub fn get(&self, pos: usize) -> &Cluster {
        &self.clusters[pos]
    }

    /// Active clusters in position order
    pub fn iter(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter()
    }

    /// Total sample count across all active clusters
    pub fn total_members(&self) -> usize {
        self.clusters.iter().map(Cluster::len).sum()
    }

    /// Replace the clusters at positions `a < b` with their union, appended at the end.
    ///
    /// The child holding the smaller sample index is concatenated first. The
    /// larger member buffer is reused for the union.
    pub fn merge(&mut self, a: usize, b: usize, height: f32) -> Result<()> {
        if a >= b || b >= self.clusters.len() {
            return Err(DendraError::invalid_input(format!(
                "cannot merge positions {} and {} of {} active clusters",
                a,
                b,
                self.clusters.len()
            )));
        }

        let second = self.clusters.remove(b);
        let first = self.clusters.remove(a);

        let (lead, tail) = if first.members[0] <= second.members[0] {
            (first.members, second.members)
        } else {
            (second.members, first.members)
        };

        let members = if lead.capacity() >= tail.capacity() {
            let mut members = lead;
            try_reserve_exact(&mut members, tail.len(), "cluster members")?;
            members.extend_from_slice(&tail);
            members
        } else {
            let mut members = tail;
            let n_tail = members.len();
            try_reserve_exact(&mut members, lead.len(), "cluster members")?;
            members.extend_from_slice(&lead);
            members.rotate_right(lead.len());
            debug_assert_eq!(members.len(), n_tail + lead.len());
            members
        };

        self.clusters.push(Cluster {
            members,
            height,
            children: Some((a, b)),
        });
        Ok(())
    }

    /// Consume the store, returning the final cluster once exactly one remains
    pub fn into_root(mut self) -> Option<Cluster> {
        if self.clusters.len() == 1 {
            self.clusters.pop()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(cluster: &Cluster) -> Vec<u32> {
        cluster.members().iter().map(|s| s.0).collect()
    }

    #[test]
    fn test_singletons() {
        let store = ClusterStore::new(4).unwrap();
        assert_eq!(store.len(), 4);
        for (i, c) in store.iter().enumerate() {
            assert_eq!(ids(c), vec![i as u32]);
            assert_eq!(c.height(), 0.0);
            assert!(c.is_leaf());
        }
    }

    #[test]
    fn test_merge_compacts_and_appends() {
        let mut store = ClusterStore::new(5).unwrap();
        store.merge(1, 3, 0.5).unwrap();

        assert_eq!(store.len(), 4);
        let order: Vec<Vec<u32>> = store.iter().map(ids).collect();
        assert_eq!(order, vec![vec![0], vec![2], vec![4], vec![1, 3]]);

        let merged = store.get(3);
        assert_eq!(merged.height(), 0.5);
        assert_eq!(merged.children(), Some((1, 3)));
        assert_eq!(store.total_members(), 5);
    }

    #[test]
    fn test_merge_adjacent_last_positions() {
        // Removing the lower position first would make `b` out of range here
        let mut store = ClusterStore::new(3).unwrap();
        store.merge(1, 2, 1.0).unwrap();
        let order: Vec<Vec<u32>> = store.iter().map(ids).collect();
        assert_eq!(order, vec![vec![0], vec![1, 2]]);
    }

    #[test]
    fn test_lower_sample_index_leads() {
        let mut store = ClusterStore::new(3).unwrap();
        store.merge(0, 1, 1.0).unwrap(); // [{2}, {0,1}]
        store.merge(0, 1, 6.0).unwrap(); // {2} at position 0, {0,1} at 1
        let root = store.into_root().unwrap();
        assert_eq!(ids(&root), vec![0, 1, 2]);
        assert_eq!(root.children(), Some((0, 1)));
    }

    #[test]
    fn test_reuses_larger_buffer_keeps_order() {
        let mut store = ClusterStore::new(6).unwrap();
        store.merge(3, 4, 1.0).unwrap(); // [{0},{1},{2},{5},{3,4}]
        store.merge(3, 4, 2.0).unwrap(); // [{0},{1},{2},{3,4,5}]
        store.merge(0, 3, 3.0).unwrap(); // small lead {0}, large tail {3,4,5}
        let last = store.get(store.len() - 1);
        assert_eq!(ids(last), vec![0, 3, 4, 5]);
        assert_eq!(store.total_members(), 6);
    }

    #[test]
    fn test_rejects_bad_positions() {
        let mut store = ClusterStore::new(3).unwrap();
        assert!(store.merge(1, 1, 0.0).is_err());
        assert!(store.merge(2, 1, 0.0).is_err());
        assert!(store.merge(0, 3, 0.0).is_err());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_into_root_requires_single_cluster() {
        let store = ClusterStore::new(2).unwrap();
        assert!(store.into_root().is_none());
    }
}
