/*
 * SPDX-FileCopyrightText: 2026 The rankgraph developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The [`IdMap`] and [`Graph`] traits.
//!
//! A [`Graph`] is read-only: algorithms never modify it. It is however not
//! assumed to be shareable between threads, as readers of compressed or
//! external graphs usually carry cursors and buffers. Each parallel task
//! must thus obtain its own handle using [`Graph::concurrent_copy`]; copies
//! must be cheap, as they are created once per task.
//!
//! Arcs are visited using [`Graph::for_each_arc`], which passes to a visitor
//! the source, the target and the weight of each arc. Graphs without a
//! relationship weight property (see [`Graph::has_weights`]) pass the
//! fallback weight provided by the caller. Callers that already know the
//! weights can use [`Graph::for_each_successor`] instead.

/// Translation between dense node identifiers and the identifiers used
/// by the outside world.
///
/// Dense identifiers are in the interval [0 . . [`num_nodes`](IdMap::num_nodes)),
/// and are the only identifiers used to index per-node arrays.
pub trait IdMap {
    /// Returns the number of nodes.
    fn num_nodes(&self) -> usize;

    /// Returns the dense identifier associated with an original identifier,
    /// or `None` if the original identifier is not part of the graph.
    fn to_mapped(&self, original: u64) -> Option<usize>;

    /// Returns the original identifier of a dense identifier.
    ///
    /// # Panics
    ///
    /// Implementations may panic if `node` is not smaller than the number
    /// of nodes.
    fn to_original(&self, node: usize) -> u64;
}

/// A read-only directed graph with optional arc weights.
pub trait Graph: IdMap {
    /// Returns the number of arcs.
    fn num_arcs(&self) -> u64;

    /// Returns the outdegree of a node.
    fn outdegree(&self, node: usize) -> usize;

    /// Returns whether this graph has a relationship weight property.
    ///
    /// If this method returns false, [`for_each_arc`](Graph::for_each_arc)
    /// will always pass the fallback weight.
    fn has_weights(&self) -> bool;

    /// Visits the outgoing arcs of a node, in adjacency order.
    ///
    /// The visitor receives the source, the target and the weight of the
    /// arc; `fallback_weight` is used for arcs with no weight. The visit
    /// stops as soon as the visitor returns false.
    fn for_each_arc(
        &self,
        node: usize,
        fallback_weight: f64,
        visitor: impl FnMut(usize, usize, f64) -> bool,
    );

    /// Visits the outgoing arcs of a node, in adjacency order, without
    /// resolving their weights.
    ///
    /// The visitor receives the source and the target of the arc. The visit
    /// stops as soon as the visitor returns false.
    fn for_each_successor(&self, node: usize, visitor: impl FnMut(usize, usize) -> bool);

    /// Returns an independent handle on this graph that can be moved to, and
    /// used by, exactly one other thread.
    fn concurrent_copy(&self) -> Self
    where
        Self: Sized;
}

impl<G: IdMap> IdMap for &G {
    #[inline(always)]
    fn num_nodes(&self) -> usize {
        (**self).num_nodes()
    }

    #[inline(always)]
    fn to_mapped(&self, original: u64) -> Option<usize> {
        (**self).to_mapped(original)
    }

    #[inline(always)]
    fn to_original(&self, node: usize) -> u64 {
        (**self).to_original(node)
    }
}

/// References to graphs that can be shared among threads are graphs
/// themselves: their concurrent copy is the reference.
impl<G: Graph + Sync> Graph for &G {
    #[inline(always)]
    fn num_arcs(&self) -> u64 {
        (**self).num_arcs()
    }

    #[inline(always)]
    fn outdegree(&self, node: usize) -> usize {
        (**self).outdegree(node)
    }

    #[inline(always)]
    fn has_weights(&self) -> bool {
        (**self).has_weights()
    }

    #[inline(always)]
    fn for_each_arc(
        &self,
        node: usize,
        fallback_weight: f64,
        visitor: impl FnMut(usize, usize, f64) -> bool,
    ) {
        (**self).for_each_arc(node, fallback_weight, visitor)
    }

    #[inline(always)]
    fn for_each_successor(&self, node: usize, visitor: impl FnMut(usize, usize) -> bool) {
        (**self).for_each_successor(node, visitor)
    }

    #[inline(always)]
    fn concurrent_copy(&self) -> Self {
        *self
    }
}
