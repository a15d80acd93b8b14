/*
 * SPDX-FileCopyrightText: 2026 The rankgraph developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![allow(dead_code)]

use rankgraph::prelude::*;
use rankgraph_algo::rank::Variant;

/// Returns the 𝓁∞ distance (maximum absolute difference) between two vectors.
pub fn l_inf_distance(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

/// Returns a directed cycle on `n` nodes with, in addition, `extra` random
/// chords, so that the result is strongly connected and has no sinks.
pub fn cycle_with_chords(n: usize, extra: f64, seed: u64) -> CsrGraph {
    let chords = ErdosRenyi::new(n, extra, seed).build();
    let mut arcs = (0..n).map(|x| (x, (x + 1) % n)).collect::<Vec<_>>();
    for x in 0..n {
        arcs.extend(chords.successors(x).iter().map(|&y| (x, y)));
    }
    CsrGraph::from_arcs(n, arcs)
}

/// Returns the uniform teleport vector.
pub fn uniform(n: usize) -> Vec<f64> {
    vec![1.0 / n as f64; n]
}

/// Computes exactly `iterations` iterations sequentially, in double
/// precision, following the textbook definitions.
pub fn reference(
    graph: &CsrGraph,
    variant: Variant,
    alpha: f64,
    teleport: &[f64],
    iterations: usize,
    default_weight: f64,
) -> Vec<f64> {
    let n = graph.num_nodes();
    let alpha = if variant == Variant::Eigenvector {
        1.0
    } else {
        alpha
    };
    let weight = |x: usize| {
        let mut arcs = vec![];
        graph.for_each_arc(x, default_weight, |_, y, w| {
            arcs.push((y, w));
            true
        });
        arcs
    };
    let degree = |x: usize| -> f64 {
        match variant {
            Variant::Weighted => weight(x).iter().map(|&(_, w)| w).filter(|&w| w > 0.0).sum(),
            _ => graph.outdegree(x) as f64,
        }
    };
    let average_degree = graph.num_arcs() as f64 / n as f64;

    let mut current = teleport
        .iter()
        .map(|&v| if alpha < 1.0 { (1.0 - alpha) * v } else { v })
        .collect::<Vec<_>>();
    for _ in 0..iterations {
        let mut merged = vec![0.0; n];
        for x in 0..n {
            let d = degree(x);
            if d == 0.0 || current[x] <= 0.0 {
                continue;
            }
            for (y, w) in weight(x) {
                merged[y] += match variant {
                    Variant::PageRank | Variant::Eigenvector => current[x] / d,
                    Variant::Weighted if w > 0.0 => current[x] * w / d,
                    Variant::Weighted => 0.0,
                    Variant::ArticleRank => current[x] / (d + average_degree),
                };
            }
        }
        current = merged
            .iter()
            .zip(teleport)
            .map(|(&m, &v)| (1.0 - alpha) * v + alpha * m)
            .collect();
    }
    current
}
