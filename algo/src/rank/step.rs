/*
 * SPDX-FileCopyrightText: 2026 The rankgraph developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{DegreeCache, Propagation};
use crate::{partition::Partitions, utils::Rows};
use dsi_progress_logger::ConcurrentProgressLog;
use rankgraph::traits::Graph;

/// How many nodes a [`ComputeStep`] processes between two checks of the
/// cancellation predicate.
pub const CANCEL_CHECK_INTERVAL: usize = 1 << 14;

/// The unit of parallel work: propagation from the nodes of one partition.
///
/// A step owns a concurrent copy of the graph and one [row](Rows) per
/// partition, and is kept across iterations. During an iteration it reads
/// the scores of the nodes of its partition, and adds the contributions sent
/// along their outgoing arcs to the row of the partition owning the target.
/// Nothing else is written.
#[derive(Debug)]
pub struct ComputeStep<G> {
    index: usize,
    graph: G,
    rows: Rows,
}

impl<G: Graph> ComputeStep<G> {
    /// Creates the step for the partition of given index.
    pub fn new(index: usize, graph: G, partitions: &Partitions) -> Self {
        assert!(index < partitions.len());
        Self {
            index,
            graph,
            rows: Rows::new(partitions),
        }
    }

    /// Returns the rows accumulated by the last iteration.
    pub fn rows(&self) -> &Rows {
        &self.rows
    }

    /// Runs an iteration, returning false if it was interrupted because
    /// `running` returned false; the content of the rows is then
    /// meaningless.
    ///
    /// Nodes with nonpositive score do not send anything. Contributions are
    /// rounded to single precision, and discarded if zero or NaN. If `P`
    /// is [weighted](Propagation::WEIGHTED), weights are taken from the
    /// degree cache if they were cached, or resolved through the graph
    /// using `default_weight` otherwise.
    #[allow(clippy::too_many_arguments)]
    pub fn run_iteration<P: Propagation>(
        &mut self,
        current: &[f64],
        degrees: &DegreeCache,
        partitions: &Partitions,
        propagation: P,
        default_weight: f64,
        running: &(impl Fn() -> bool + Sync),
        cpl: &mut impl ConcurrentProgressLog,
    ) -> bool {
        let Self { index, graph, rows } = self;
        let part = partitions.parts()[*index];
        let starts = partitions.starts();
        let cached = if P::WEIGHTED {
            degrees.cached_weights(*index)
        } else {
            None
        };

        rows.clear();

        for (i, node) in part.range().enumerate() {
            if i % CANCEL_CHECK_INTERVAL == 0 && i != 0 && !running() {
                return false;
            }

            let score = current[node];
            if score <= 0.0 {
                continue;
            }
            let Some(unit) = propagation.unit(score, degrees.degree(node)) else {
                continue;
            };

            let mut send = |dst: usize, weight: f64| {
                let contribution = propagation.along(unit, weight) as f32;
                if contribution != 0.0 && !contribution.is_nan() {
                    let q = partitions.owner(dst);
                    rows.add(q, dst - starts[q], contribution);
                }
            };
            match cached {
                Some(weights) => {
                    let mut row = weights[i].iter();
                    graph.for_each_successor(node, |_, dst| {
                        if let Some(&weight) = row.next() {
                            send(dst, weight);
                        }
                        true
                    });
                }
                None => graph.for_each_arc(node, default_weight, |_, dst, weight| {
                    send(dst, weight);
                    true
                }),
            }
        }

        cpl.update_with_count(part.len);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{partition::MAX_PARTITION_SIZE, rank::variant::*};
    use dsi_progress_logger::no_logging;
    use rankgraph::prelude::*;
    use std::cell::Cell;

    fn thread_pool() -> rayon::ThreadPool {
        rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .build()
            .unwrap()
    }

    #[test]
    fn test_scatter() {
        // 0 -> 1, 0 -> 3, 1 -> 2, 2 -> 3
        let graph = CsrGraph::from_arcs(4, [(0, 1), (0, 3), (1, 2), (2, 3)]);
        let partitions = Partitions::range(4, 2, 1, MAX_PARTITION_SIZE).unwrap();
        let degrees = DegreeCache::build(
            &graph,
            &partitions,
            false,
            1.0,
            false,
            &thread_pool(),
            no_logging![],
        );
        let mut step = ComputeStep::new(0, &graph, &partitions);
        let current = [0.5, 0.0, 1.0, 1.0];
        assert!(step.run_iteration(
            &current,
            &degrees,
            &partitions,
            Uniform,
            1.0,
            &|| true,
            no_logging![]
        ));
        // Node 1 has score zero and sends nothing
        assert_eq!(step.rows().row(0), &[0.0, 0.25]);
        assert_eq!(step.rows().row(1), &[0.0, 0.25]);

        // Rows are cleared at each iteration
        let current = [0.0, 1.0, 0.0, 0.0];
        step.run_iteration(
            &current,
            &degrees,
            &partitions,
            Uniform,
            1.0,
            &|| true,
            no_logging![],
        );
        assert_eq!(step.rows().row(0), &[0.0, 0.0]);
        assert_eq!(step.rows().row(1), &[1.0, 0.0]);
    }

    #[test]
    fn test_cached_weights() {
        let graph = CsrGraph::from_weighted_arcs(3, [(0, 1, 1.0), (0, 2, 3.0), (1, 0, -2.0)]);
        let partitions = Partitions::range(3, 1, 1, MAX_PARTITION_SIZE).unwrap();
        for cache_weights in [false, true] {
            let degrees = DegreeCache::build(
                &graph,
                &partitions,
                true,
                1.0,
                cache_weights,
                &thread_pool(),
                no_logging![],
            );
            assert_eq!(degrees.has_cached_weights(), cache_weights);
            let mut step = ComputeStep::new(0, &graph, &partitions);
            step.run_iteration(
                &[1.0, 1.0, 0.0],
                &degrees,
                &partitions,
                Proportional,
                1.0,
                &|| true,
                no_logging![],
            );
            assert_eq!(step.rows().row(0), &[0.0, 0.25, 0.75]);
        }
    }

    /// Counts the arcs whose weight is resolved through the graph.
    #[derive(Clone, Copy)]
    struct Resolutions<'a> {
        graph: &'a CsrGraph,
        count: &'a Cell<usize>,
    }

    impl IdMap for Resolutions<'_> {
        fn num_nodes(&self) -> usize {
            self.graph.num_nodes()
        }

        fn to_mapped(&self, original: u64) -> Option<usize> {
            self.graph.to_mapped(original)
        }

        fn to_original(&self, node: usize) -> u64 {
            self.graph.to_original(node)
        }
    }

    impl Graph for Resolutions<'_> {
        fn num_arcs(&self) -> u64 {
            self.graph.num_arcs()
        }

        fn outdegree(&self, node: usize) -> usize {
            self.graph.outdegree(node)
        }

        fn has_weights(&self) -> bool {
            self.graph.has_weights()
        }

        fn for_each_arc(
            &self,
            node: usize,
            fallback_weight: f64,
            mut visitor: impl FnMut(usize, usize, f64) -> bool,
        ) {
            self.graph.for_each_arc(node, fallback_weight, |src, dst, weight| {
                self.count.set(self.count.get() + 1);
                visitor(src, dst, weight)
            })
        }

        fn for_each_successor(&self, node: usize, visitor: impl FnMut(usize, usize) -> bool) {
            self.graph.for_each_successor(node, visitor)
        }

        fn concurrent_copy(&self) -> Self {
            *self
        }
    }

    #[test]
    fn test_cached_weights_not_resolved() {
        let graph = CsrGraph::from_weighted_arcs(
            4,
            [(0, 1, 2.0), (0, 2, f64::NAN), (1, 3, 1.0), (2, 3, 0.5), (3, 0, 4.0)],
        );
        let partitions = Partitions::range(4, 2, 1, MAX_PARTITION_SIZE).unwrap();
        for cache_weights in [false, true] {
            let degrees = DegreeCache::build(
                &graph,
                &partitions,
                true,
                1.5,
                cache_weights,
                &thread_pool(),
                no_logging![],
            );
            let count = Cell::new(0);
            let counting = Resolutions {
                graph: &graph,
                count: &count,
            };
            let mut rows = vec![];
            for index in 0..partitions.len() {
                let mut step = ComputeStep::new(index, counting, &partitions);
                for _ in 0..10 {
                    step.run_iteration(
                        &[0.25; 4],
                        &degrees,
                        &partitions,
                        Proportional,
                        1.5,
                        &|| true,
                        no_logging![],
                    );
                }
                rows.push(step.rows().row(0).to_vec());
                rows.push(step.rows().row(1).to_vec());
            }
            assert_eq!(count.get(), if cache_weights { 0 } else { 50 });
            // Node 0 has weighted degree 3.5, as the missing weight resolves to 1.5
            assert_eq!(rows[0], vec![0.0, (0.5 / 3.5) as f32]);
            assert!((rows[1][0] - (0.375 / 3.5) as f32).abs() < 1E-7);
            assert_eq!(rows[1][1], 0.25);
            assert_eq!(rows[2], vec![0.25, 0.0]);
            assert_eq!(rows[3], vec![0.0, 0.25]);
        }
    }

    #[test]
    fn test_cancelled() {
        let n = 3 * CANCEL_CHECK_INTERVAL;
        let graph = CsrGraph::from_arcs(n, (0..n).map(|x| (x, (x + 1) % n)));
        let partitions = Partitions::range(n, 1, 1, MAX_PARTITION_SIZE).unwrap();
        let degrees = DegreeCache::build(
            &graph,
            &partitions,
            false,
            1.0,
            false,
            &thread_pool(),
            no_logging![],
        );
        let mut step = ComputeStep::new(0, &graph, &partitions);
        let current = vec![1.0 / n as f64; n];
        assert!(!step.run_iteration(
            &current,
            &degrees,
            &partitions,
            Uniform,
            1.0,
            &|| false,
            no_logging![]
        ));
    }
}
