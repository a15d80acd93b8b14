/*
 * SPDX-FileCopyrightText: 2026 The rankgraph developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::id_mapping::IdMapping;
use crate::traits::*;
use std::sync::Arc;

#[derive(Debug)]
struct Storage {
    /// The degree-cumulative function: successors of `x` are at positions
    /// `dcf[x]..dcf[x + 1]`.
    dcf: Box<[usize]>,
    successors: Box<[usize]>,
    /// Parallel to `successors`; NaN marks a missing weight.
    weights: Option<Box<[f64]>>,
    ids: IdMapping,
}

/// An immutable compressed sparse-row graph, optionally weighted.
///
/// The graph stores the degree-cumulative function (DCF) and the
/// concatenation of all successor lists; if the graph is weighted, a third
/// array parallel to the successors contains the weights, with NaN denoting
/// a missing weight (which will be replaced by the fallback weight passed to
/// [`for_each_arc`](Graph::for_each_arc)).
///
/// Storage is reference counted, so [concurrent
/// copies](Graph::concurrent_copy) just clone a pointer.
///
/// Successors are kept in the order in which arcs were provided.
///
/// # Examples
///
/// ```
/// use rankgraph::prelude::*;
///
/// let graph = CsrGraph::from_arcs(3, [(0, 1), (1, 2), (2, 0), (0, 2)]);
/// assert_eq!(graph.num_nodes(), 3);
/// assert_eq!(graph.num_arcs(), 4);
/// assert_eq!(graph.outdegree(0), 2);
/// assert_eq!(graph.successors(0), &[1, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct CsrGraph {
    storage: Arc<Storage>,
}

impl CsrGraph {
    /// Creates an unweighted graph with `num_nodes` nodes from a list of arcs.
    ///
    /// # Panics
    ///
    /// Panics if an arc refers to a node outside of [0 . . `num_nodes`).
    pub fn from_arcs(num_nodes: usize, arcs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let arcs = arcs.into_iter().map(|(src, dst)| (src, dst, f64::NAN));
        Self::build(num_nodes, arcs, false, IdMapping::identity(num_nodes))
    }

    /// Creates a weighted graph with `num_nodes` nodes from a list of arcs
    /// with weights.
    ///
    /// # Panics
    ///
    /// Panics if an arc refers to a node outside of [0 . . `num_nodes`).
    pub fn from_weighted_arcs(
        num_nodes: usize,
        arcs: impl IntoIterator<Item = (usize, usize, f64)>,
    ) -> Self {
        Self::build(num_nodes, arcs, true, IdMapping::identity(num_nodes))
    }

    /// Creates an empty graph with the given number of nodes.
    pub fn empty(num_nodes: usize) -> Self {
        Self::from_arcs(num_nodes, [])
    }

    pub(crate) fn build(
        num_nodes: usize,
        arcs: impl IntoIterator<Item = (usize, usize, f64)>,
        weighted: bool,
        ids: IdMapping,
    ) -> Self {
        debug_assert_eq!(ids.num_nodes(), num_nodes);
        let mut arcs = arcs.into_iter().collect::<Vec<_>>();
        for &(src, dst, _) in &arcs {
            assert!(
                src < num_nodes && dst < num_nodes,
                "Arc ({src}, {dst}) out of range (num nodes: {num_nodes})"
            );
        }
        // Stable, so successors keep the order in which arcs were given
        arcs.sort_by_key(|&(src, _, _)| src);

        let mut dcf = Vec::with_capacity(num_nodes + 1);
        dcf.push(0);
        let mut successors = Vec::with_capacity(arcs.len());
        let mut weights = Vec::with_capacity(if weighted { arcs.len() } else { 0 });

        let mut last_src = 0;
        for (src, dst, weight) in arcs {
            while last_src < src {
                dcf.push(successors.len());
                last_src += 1;
            }
            successors.push(dst);
            if weighted {
                weights.push(weight);
            }
        }
        while dcf.len() < num_nodes + 1 {
            dcf.push(successors.len());
        }

        Self {
            storage: Arc::new(Storage {
                dcf: dcf.into_boxed_slice(),
                successors: successors.into_boxed_slice(),
                weights: weighted.then(|| weights.into_boxed_slice()),
                ids,
            }),
        }
    }

    /// Returns the successors of a node.
    pub fn successors(&self, node: usize) -> &[usize] {
        let s = &self.storage;
        &s.successors[s.dcf[node]..s.dcf[node + 1]]
    }

    /// Returns the weights of the arcs of a node, if the graph is weighted.
    ///
    /// Missing weights are represented by NaN.
    pub fn weights(&self, node: usize) -> Option<&[f64]> {
        let s = &self.storage;
        s.weights
            .as_deref()
            .map(|weights| &weights[s.dcf[node]..s.dcf[node + 1]])
    }

    /// Returns the id mapping of this graph.
    pub fn id_mapping(&self) -> &IdMapping {
        &self.storage.ids
    }
}

impl IdMap for CsrGraph {
    #[inline(always)]
    fn num_nodes(&self) -> usize {
        self.storage.dcf.len() - 1
    }

    #[inline(always)]
    fn to_mapped(&self, original: u64) -> Option<usize> {
        self.storage.ids.to_mapped(original)
    }

    #[inline(always)]
    fn to_original(&self, node: usize) -> u64 {
        self.storage.ids.to_original(node)
    }
}

impl Graph for CsrGraph {
    #[inline(always)]
    fn num_arcs(&self) -> u64 {
        self.storage.successors.len() as u64
    }

    #[inline(always)]
    fn outdegree(&self, node: usize) -> usize {
        self.storage.dcf[node + 1] - self.storage.dcf[node]
    }

    #[inline(always)]
    fn has_weights(&self) -> bool {
        self.storage.weights.is_some()
    }

    fn for_each_arc(
        &self,
        node: usize,
        fallback_weight: f64,
        mut visitor: impl FnMut(usize, usize, f64) -> bool,
    ) {
        let s = &self.storage;
        let (start, end) = (s.dcf[node], s.dcf[node + 1]);
        match &s.weights {
            None => {
                for &dst in &s.successors[start..end] {
                    if !visitor(node, dst, fallback_weight) {
                        return;
                    }
                }
            }
            Some(weights) => {
                for (&dst, &weight) in s.successors[start..end].iter().zip(&weights[start..end]) {
                    let weight = if weight.is_nan() {
                        fallback_weight
                    } else {
                        weight
                    };
                    if !visitor(node, dst, weight) {
                        return;
                    }
                }
            }
        }
    }

    fn for_each_successor(&self, node: usize, mut visitor: impl FnMut(usize, usize) -> bool) {
        let s = &self.storage;
        for &dst in &s.successors[s.dcf[node]..s.dcf[node + 1]] {
            if !visitor(node, dst) {
                return;
            }
        }
    }

    fn concurrent_copy(&self) -> Self {
        self.clone()
    }
}
