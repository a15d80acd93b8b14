/*
 * SPDX-FileCopyrightText: 2026 The rankgraph developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::partition::Partitions;
use dsi_progress_logger::ConcurrentProgressLog;
use kahan::KahanSum;
use rankgraph::{traits::Graph, utils::RaggedArray};
use rayon::{ThreadPool, prelude::*};

/// Per-node degrees, and optionally per-arc resolved weights.
///
/// For unweighted propagation the degree of a node is its outdegree; for
/// weighted propagation it is the sum of the positive resolved weights of
/// its outgoing arcs, where missing weights resolve to a default weight.
///
/// If requested, the resolved weight of every arc is cached, so that
/// iterations do not have to resolve weights again. Cached weights are
/// stored in a [`RaggedArray`] per partition, with one row per node
/// containing the weights of the outgoing arcs in adjacency order.
#[derive(Debug, Clone)]
pub struct DegreeCache {
    degrees: Box<[f64]>,
    weights: Option<Box<[RaggedArray<f64>]>>,
}

impl DegreeCache {
    /// Computes degrees in parallel, with one task per partition.
    ///
    /// If `weighted` is false, `default_weight` and `cache_weights` are
    /// ignored.
    ///
    /// # Arguments
    ///
    /// * `graph` - The graph; each task uses its own [concurrent
    ///   copy](Graph::concurrent_copy).
    ///
    /// * `partitions` - The partitions of the nodes of the graph.
    ///
    /// * `weighted` - Whether degrees are sums of weights.
    ///
    /// * `default_weight` - The weight of arcs without a weight.
    ///
    /// * `cache_weights` - Whether to cache the resolved weights.
    ///
    /// * `thread_pool` - The thread pool to use.
    ///
    /// * `cpl` - A concurrent progress logger counting nodes.
    pub fn build<G: Graph + Send>(
        graph: &G,
        partitions: &Partitions,
        weighted: bool,
        default_weight: f64,
        cache_weights: bool,
        thread_pool: &ThreadPool,
        cpl: &mut impl ConcurrentProgressLog,
    ) -> Self {
        let num_nodes = graph.num_nodes();
        assert_eq!(partitions.num_nodes(), num_nodes);
        let cache_weights = weighted && cache_weights;

        let mut degrees = vec![0.0; num_nodes].into_boxed_slice();
        let copies = partitions
            .iter()
            .map(|_| graph.concurrent_copy())
            .collect::<Vec<_>>();

        cpl.item_name("node");
        cpl.expected_updates(Some(num_nodes));
        cpl.start(if weighted {
            "Computing weighted degrees..."
        } else {
            "Computing degrees..."
        });

        let task_cpl = cpl.clone();
        let weights: Vec<Option<RaggedArray<f64>>> = thread_pool.install(|| {
            partitions
                .split_mut(&mut degrees)
                .into_par_iter()
                .zip(copies)
                .zip(partitions.parts().par_iter())
                .map_with(task_cpl, |cpl, ((degrees, graph), part)| {
                    let mut cache = cache_weights.then(|| {
                        let num_arcs = part.range().map(|x| graph.outdegree(x)).sum::<usize>();
                        RaggedArray::with_capacity(part.len, num_arcs)
                    });
                    for (degree, node) in degrees.iter_mut().zip(part.range()) {
                        if !weighted {
                            *degree = graph.outdegree(node) as f64;
                            continue;
                        }
                        let mut sum = 0.0;
                        let mut row = Vec::new();
                        graph.for_each_arc(node, default_weight, |_, _, weight| {
                            // This excludes NaN, too
                            if weight > 0.0 {
                                sum += weight;
                            }
                            if cache.is_some() {
                                row.push(weight);
                            }
                            true
                        });
                        *degree = sum;
                        if let Some(cache) = cache.as_mut() {
                            cache.push(row);
                        }
                    }
                    cpl.update_with_count(part.len);
                    cache
                })
                .collect()
        });

        cpl.done();

        Self {
            degrees,
            weights: if cache_weights {
                Some(weights.into_iter().flatten().collect())
            } else {
                None
            },
        }
    }

    /// Returns the degree of a node.
    #[inline(always)]
    pub fn degree(&self, node: usize) -> f64 {
        self.degrees[node]
    }

    /// Returns all degrees.
    pub fn degrees(&self) -> &[f64] {
        &self.degrees
    }

    /// Returns whether resolved weights have been cached.
    pub fn has_cached_weights(&self) -> bool {
        self.weights.is_some()
    }

    /// Returns the cached resolved weights of the nodes of a partition, if
    /// available.
    ///
    /// Row *i* contains the weights of the outgoing arcs of the *i*-th node
    /// of the partition.
    #[inline(always)]
    pub fn cached_weights(&self, part: usize) -> Option<&RaggedArray<f64>> {
        self.weights.as_ref().map(|weights| &weights[part])
    }

    /// Returns the average degree, or zero if there are no nodes.
    pub fn average_degree(&self) -> f64 {
        if self.degrees.is_empty() {
            return 0.0;
        }
        let sum = self
            .degrees
            .iter()
            .fold(KahanSum::<f64>::new(), |sum, &d| sum + d)
            .sum();
        sum / self.degrees.len() as f64
    }

    /// Returns the number of nodes with zero degree.
    pub fn num_sinks(&self) -> usize {
        self.degrees.iter().filter(|&&d| d == 0.0).count()
    }
}
