/*
 * SPDX-FileCopyrightText: 2026 The rankgraph developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::graphs::csr_graph::CsrGraph;
use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Generates Erdös-Rényi random graphs.
///
/// The model is parameterized by the number of nodes `n` and the probability
/// `p` of an arc between any two distinct nodes; loops are never included.
/// Generation is deterministic for a given seed of the [pseudorandom number
/// generator](SmallRng), and takes time quadratic in `n`.
#[derive(Debug, Clone)]
pub struct ErdosRenyi {
    n: usize,
    p: f64,
    seed: u64,
}

impl ErdosRenyi {
    /// Creates a new Erdös-Rényi random graph generator, given the number of
    /// nodes, the probability of an arc between any two nodes, and a seed.
    pub fn new(n: usize, p: f64, seed: u64) -> Self {
        assert!((0.0..=1.0).contains(&p), "p must be in [0..1]");
        Self { n, p, seed }
    }

    fn arcs(&self, rng: &mut SmallRng) -> Vec<(usize, usize)> {
        let mut arcs = Vec::new();
        for x in 0..self.n {
            for y in 0..self.n {
                if x != y && rng.random_bool(self.p) {
                    arcs.push((x, y));
                }
            }
        }
        arcs
    }

    /// Generates an unweighted graph.
    pub fn build(&self) -> CsrGraph {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        CsrGraph::from_arcs(self.n, self.arcs(&mut rng))
    }

    /// Generates a weighted graph with weights uniformly distributed in
    /// [`min_weight` . . `max_weight`).
    pub fn build_weighted(&self, min_weight: f64, max_weight: f64) -> CsrGraph {
        assert!(
            min_weight < max_weight,
            "The weight range [{min_weight} . . {max_weight}) is empty"
        );
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let arcs = self.arcs(&mut rng);
        let weighted = arcs
            .into_iter()
            .map(|(x, y)| (x, y, rng.random_range(min_weight..max_weight)))
            .collect::<Vec<_>>();
        CsrGraph::from_weighted_arcs(self.n, weighted)
    }
}
