/*
 * SPDX-FileCopyrightText: 2026 The rankgraph developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{csr_graph::CsrGraph, id_mapping::IdMapping};
use anyhow::{Result, ensure};
use rayon::prelude::*;
use std::collections::HashMap;

/// How dense identifiers are assigned to original identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdOrder {
    /// Nodes are numbered in order of first appearance.
    #[default]
    Appearance,
    /// Nodes are numbered in increasing order of original identifier.
    Sorted,
}

/// Builds a [`CsrGraph`] from arcs expressed using original identifiers.
///
/// Original identifiers are arbitrary `u64` values; dense identifiers are
/// assigned following the [`IdOrder`]. Isolated nodes can be added with
/// [`add_node`](ArcListBuilder::add_node).
///
/// If at least one arc is added with a weight the resulting graph is
/// weighted, and arcs added without a weight will resolve to the fallback
/// weight at visit time.
///
/// # Examples
///
/// ```
/// use rankgraph::prelude::*;
///
/// let mut builder = ArcListBuilder::new();
/// builder.add_arc(100, 200).add_weighted_arc(200, 100, 2.5).add_node(300);
/// let graph = builder.build()?;
/// assert_eq!(graph.num_nodes(), 3);
/// assert_eq!(graph.to_original(0), 100);
/// assert_eq!(graph.to_mapped(300), Some(2));
/// assert!(graph.has_weights());
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArcListBuilder {
    order: IdOrder,
    /// Nodes added explicitly, with the number of arcs added before them.
    nodes: Vec<(usize, u64)>,
    arcs: Vec<(u64, u64, Option<f64>)>,
    weighted: bool,
}

impl ArcListBuilder {
    /// Creates a new builder numbering nodes in order of appearance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how dense identifiers are assigned.
    pub fn id_order(&mut self, order: IdOrder) -> &mut Self {
        self.order = order;
        self
    }

    /// Adds a node, which might have no arcs.
    pub fn add_node(&mut self, node: u64) -> &mut Self {
        self.nodes.push((self.arcs.len(), node));
        self
    }

    /// Adds an arc without weight.
    pub fn add_arc(&mut self, src: u64, dst: u64) -> &mut Self {
        self.arcs.push((src, dst, None));
        self
    }

    /// Adds an arc with a weight.
    ///
    /// The weight cannot be NaN (this will be reported by
    /// [`build`](ArcListBuilder::build)); it can however be zero or
    /// negative.
    pub fn add_weighted_arc(&mut self, src: u64, dst: u64, weight: f64) -> &mut Self {
        self.weighted = true;
        self.arcs.push((src, dst, Some(weight)));
        self
    }

    /// Adds arcs without weights.
    pub fn add_arcs(&mut self, arcs: impl IntoIterator<Item = (u64, u64)>) -> &mut Self {
        for (src, dst) in arcs {
            self.add_arc(src, dst);
        }
        self
    }

    /// Builds the graph.
    pub fn build(&self) -> Result<CsrGraph> {
        let mut originals = Vec::new();
        let mut seen = HashMap::new();
        let mut map = |original: u64| {
            *seen.entry(original).or_insert_with(|| {
                originals.push(original);
                originals.len() - 1
            })
        };

        let mut arcs = Vec::with_capacity(self.arcs.len());
        let mut nodes = self.nodes.iter().peekable();
        for (i, &(src, dst, weight)) in self.arcs.iter().enumerate() {
            while let Some((_, node)) = nodes.next_if(|&&(pos, _)| pos == i) {
                map(*node);
            }
            ensure!(
                !weight.is_some_and(f64::is_nan),
                "Arc {i} ({src}, {dst}) has a NaN weight"
            );
            arcs.push((map(src), map(dst), weight.unwrap_or(f64::NAN)));
        }
        for &(_, node) in nodes {
            map(node);
        }

        if self.order == IdOrder::Sorted {
            // Renumber following the order of original identifiers
            let mut perm = (0..originals.len()).collect::<Vec<_>>();
            perm.par_sort_unstable_by_key(|&node| originals[node]);
            let mut inv = vec![0; perm.len()];
            for (rank, &node) in perm.iter().enumerate() {
                inv[node] = rank;
            }
            for arc in arcs.iter_mut() {
                arc.0 = inv[arc.0];
                arc.1 = inv[arc.1];
            }
            originals.par_sort_unstable();
        }

        log::debug!(
            "Building graph with {} nodes and {} arcs",
            originals.len(),
            arcs.len()
        );
        let num_nodes = originals.len();
        Ok(CsrGraph::build(
            num_nodes,
            arcs,
            self.weighted,
            IdMapping::from_originals(originals),
        ))
    }
}
