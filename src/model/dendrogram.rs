//! # Dendrogram
//!
//! Result of a completed clustering run: one merge record per iteration plus
//! the final leaf order.
//!
//! ## Index convention
//! `merge_a[k]` / `merge_b[k]` are positions in the active cluster list at
//! iteration `k` (with `merge_a[k] < merge_b[k]`), not stable identifiers.
//! The store removes both entries, compacts, and appends the merged cluster,
//! so position `len - 1` always holds the most recent merge.
//! [`Dendrogram::linkage_matrix`] replays that bookkeeping to produce the
//! stable-id encoding (leaves `0..N`, merge `k` creates id `N + k`).

use std::fmt::Write as _;

use serde::Serialize;

use crate::data::SampleIdx;
use crate::error::{try_reserve_exact, Result};

/// One merge step: the two active positions joined and the linkage distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MergeRecord {
    pub height: f32,
    pub a: usize,
    pub b: usize,
}

/// One row of the stable-id linkage encoding
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinkageRow {
    /// Node id of the child listed first in the leaf order
    pub left: usize,
    pub right: usize,
    pub height: f32,
    /// Number of samples under the new node
    pub size: usize,
}

/// Merge sequence and leaf order of a full clustering run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dendrogram {
    n_samples: usize,
    heights: Vec<f32>,
    merge_a: Vec<usize>,
    merge_b: Vec<usize>,
    leaf_order: Vec<SampleIdx>,
}

impl Dendrogram {
    /// Empty record buffers sized for `n_samples - 1` merges
    pub(crate) fn with_capacity(n_samples: usize) -> Result<Self> {
        let n_merges = n_samples.saturating_sub(1);
        let mut heights = Vec::new();
        let mut merge_a = Vec::new();
        let mut merge_b = Vec::new();
        try_reserve_exact(&mut heights, n_merges, "merge heights")?;
        try_reserve_exact(&mut merge_a, n_merges, "merge positions")?;
        try_reserve_exact(&mut merge_b, n_merges, "merge positions")?;
        Ok(Self {
            n_samples,
            heights,
            merge_a,
            merge_b,
            leaf_order: Vec::new(),
        })
    }

    pub(crate) fn push(&mut self, merge: MergeRecord) {
        self.heights.push(merge.height);
        self.merge_a.push(merge.a);
        self.merge_b.push(merge.b);
    }

    pub(crate) fn set_leaf_order(&mut self, leaf_order: Vec<SampleIdx>) {
        self.leaf_order = leaf_order;
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn n_merges(&self) -> usize {
        self.heights.len()
    }

    /// Linkage distance of each merge, in merge order
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    pub fn merge_a(&self) -> &[usize] {
        &self.merge_a
    }

    pub fn merge_b(&self) -> &[usize] {
        &self.merge_b
    }

    /// Sample indices of the root cluster, in concatenation order
    pub fn leaf_order(&self) -> &[SampleIdx] {
        &self.leaf_order
    }

    pub fn merges(&self) -> impl Iterator<Item = MergeRecord> + '_ {
        self.heights
            .iter()
            .zip(&self.merge_a)
            .zip(&self.merge_b)
            .map(|((&height, &a), &b)| MergeRecord { height, a, b })
    }

    /// Replay the positional merges into stable node ids.
    ///
    /// Children are ordered the way the cluster store concatenates them: the
    /// one containing the smaller sample index comes first.
    pub fn linkage_matrix(&self) -> Vec<LinkageRow> {
        #[derive(Clone, Copy)]
        struct Node {
            id: usize,
            size: usize,
            min_sample: usize,
        }

        let n = self.n_samples;
        let mut active: Vec<Node> = (0..n)
            .map(|i| Node {
                id: i,
                size: 1,
                min_sample: i,
            })
            .collect();
        let mut rows = Vec::with_capacity(self.n_merges());

        for (k, merge) in self.merges().enumerate() {
            let second = active.remove(merge.b);
            let first = active.remove(merge.a);
            let (left, right) = if first.min_sample <= second.min_sample {
                (first, second)
            } else {
                (second, first)
            };
            let size = left.size + right.size;
            rows.push(LinkageRow {
                left: left.id,
                right: right.id,
                height: merge.height,
                size,
            });
            active.push(Node {
                id: n + k,
                size,
                min_sample: left.min_sample,
            });
        }
        rows
    }

    /// Render the tree in Newick format.
    ///
    /// Leaves are named by `labels[i]` when given, else by sample index.
    /// Branch lengths are height differences between parent and child.
    pub fn to_newick(&self, labels: Option<&[String]>) -> String {
        enum Step {
            Enter { node: usize, parent_height: Option<f32> },
            Separator,
            Close { node: usize, parent_height: Option<f32> },
        }

        let n = self.n_samples;
        let rows = self.linkage_matrix();
        let height = |node: usize| if node < n { 0.0 } else { rows[node - n].height };

        let mut out = String::new();
        let Some(root) = (n + rows.len()).checked_sub(1) else {
            out.push(';');
            return out;
        };

        let mut stack = vec![Step::Enter {
            node: root,
            parent_height: None,
        }];
        while let Some(step) = stack.pop() {
            match step {
                Step::Enter { node, parent_height } if node < n => {
                    match labels.and_then(|l| l.get(node)) {
                        Some(label) => out.push_str(&newick_label(label)),
                        None => {
                            let _ = write!(out, "{}", node);
                        }
                    }
                    write_branch(&mut out, parent_height, 0.0);
                }
                Step::Enter { node, parent_height } => {
                    let row = rows[node - n];
                    out.push('(');
                    let h = Some(row.height);
                    stack.push(Step::Close {
                        node,
                        parent_height,
                    });
                    stack.push(Step::Enter {
                        node: row.right,
                        parent_height: h,
                    });
                    stack.push(Step::Separator);
                    stack.push(Step::Enter {
                        node: row.left,
                        parent_height: h,
                    });
                }
                Step::Separator => out.push(','),
                Step::Close {
                    node,
                    parent_height,
                } => {
                    out.push(')');
                    write_branch(&mut out, parent_height, height(node));
                }
            }
        }
        out.push(';');
        out
    }
}

fn write_branch(out: &mut String, parent_height: Option<f32>, height: f32) {
    if let Some(parent) = parent_height {
        let _ = write!(out, ":{}", (parent - height).max(0.0));
    }
}

/// Quote a label if it contains Newick metacharacters
fn newick_label(label: &str) -> String {
    let needs_quotes = label
        .chars()
        .any(|c| c.is_whitespace() || "()[]':;,".contains(c));
    if needs_quotes {
        format!("'{}'", label.replace('\'', "''"))
    } else {
        label.to_string()
    }
}
