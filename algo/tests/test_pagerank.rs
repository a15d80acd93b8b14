/*
 * SPDX-FileCopyrightText: 2026 The rankgraph developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

mod common;

use anyhow::Result;
use common::*;
use rankgraph::prelude::*;
use rankgraph_algo::prelude::*;

#[test]
fn test_empty() -> Result<()> {
    let graph = CsrGraph::empty(0);
    let ranks = PageRank::new(&graph).run()?;
    assert!(ranks.scores().is_empty());
    assert_eq!(ranks.ran_iterations(), 0);
    assert!(ranks.did_converge());
    assert_eq!(ranks.delta(), None);
    Ok(())
}

/// On a directed 4-cycle all nodes are equivalent under rotation.
#[test]
fn test_four_cycle() -> Result<()> {
    let graph = CsrGraph::from_arcs(4, [(0, 1), (1, 2), (2, 3), (3, 0)]);
    for concurrency in [1, 2, 4] {
        let ranks = PageRank::new(&graph)
            .damping_factor(0.85)
            .tolerance(1E-10)
            .max_iterations(100)
            .concurrency(concurrency)
            .min_batch_size(1)
            .run()?;
        let scores = ranks.scores();
        for &score in scores {
            assert!((score - scores[0]).abs() < 1E-6);
            assert!((score - 0.25).abs() < 1E-6, "{score}");
        }
    }
    Ok(())
}

#[test]
fn test_isolated_node() -> Result<()> {
    let graph = CsrGraph::empty(1);
    let ranks = PageRank::new(&graph).run()?;
    assert_eq!(ranks.ran_iterations(), 1);
    assert!(ranks.did_converge());
    assert_eq!(ranks.termination(), Termination::Converged);
    assert!((ranks.scores()[0] - 0.15).abs() < 1E-12);
    Ok(())
}

/// A single arc carries all the score of its source, whatever its weight.
#[test]
fn test_single_arc_weight_invariance() -> Result<()> {
    let unweighted = CsrGraph::from_arcs(2, [(0, 1)]);
    let weighted = CsrGraph::from_weighted_arcs(2, [(0, 1, 5.0)]);

    let plain = PageRank::new(&unweighted).run()?;
    let heavy = PageRank::new(&weighted).variant(Variant::Weighted).run()?;

    // 0.15 / 2 + 0.85 * 0.15 / 2
    assert!((plain.scores()[1] - 0.13875).abs() < 1E-7);
    assert!((plain.scores()[1] - heavy.scores()[1]).abs() < 1E-7);
    assert!((plain.scores()[0] - heavy.scores()[0]).abs() < 1E-12);
    Ok(())
}

#[test]
fn test_eigenvector_conservation() -> Result<()> {
    let graph = cycle_with_chords(200, 0.02, 0);
    for iterations in 1..=10 {
        let ranks = PageRank::new(&graph)
            .variant(Variant::Eigenvector)
            .tolerance(0.0)
            .max_iterations(iterations)
            .concurrency(3)
            .min_batch_size(1)
            .run()?;
        let sum = ranks.scores().iter().sum::<f64>();
        assert!((sum - 1.0).abs() < 1E-5, "iteration {iterations}: {sum}");
    }
    Ok(())
}

#[test]
fn test_monotone_convergence() -> Result<()> {
    let graph = cycle_with_chords(500, 0.01, 1);
    let ranks = PageRank::new(&graph)
        .norm(Norm::L1)
        .tolerance(0.0)
        .max_iterations(40)
        .concurrency(4)
        .min_batch_size(1)
        .run()?;
    let deltas = ranks.deltas();
    for k in 2..deltas.len() - 1 {
        if deltas[k] < 1E-5 {
            break;
        }
        assert!(
            deltas[k + 1] <= deltas[k],
            "delta {} = {} > delta {} = {}",
            k + 1,
            deltas[k + 1],
            k,
            deltas[k]
        );
    }
    Ok(())
}

#[test]
fn test_unit_weights() -> Result<()> {
    let graph = ErdosRenyi::new(100, 0.05, 2).build();
    let mut arcs = vec![];
    for x in 0..graph.num_nodes() {
        arcs.extend(graph.successors(x).iter().map(|&y| (x, y, 1.0)));
    }
    let weighted = CsrGraph::from_weighted_arcs(graph.num_nodes(), arcs);

    let plain = PageRank::new(&graph).concurrency(2).min_batch_size(1).run()?;
    let ranks = PageRank::new(&weighted)
        .variant(Variant::Weighted)
        .concurrency(2)
        .min_batch_size(1)
        .run()?;
    assert_eq!(plain.ran_iterations(), ranks.ran_iterations());
    assert!(l_inf_distance(plain.scores(), ranks.scores()) < 1E-12);
    Ok(())
}

#[test]
fn test_deterministic() -> Result<()> {
    let graph = ErdosRenyi::new(300, 0.02, 3).build();
    for partitioning in [Partitioning::Range, Partitioning::ByDegree] {
        let run = || {
            PageRank::new(&graph)
                .partitioning(partitioning)
                .concurrency(4)
                .min_batch_size(1)
                .tolerance(1E-9)
                .max_iterations(50)
                .run()
        };
        let first = run()?;
        let second = run()?;
        assert_eq!(first.ran_iterations(), second.ran_iterations());
        assert_eq!(first.scores(), second.scores());
        assert_eq!(&*first.into_scores(), second.scores());
    }
    Ok(())
}

/// Compares all variants with a sequential double-precision reference.
#[test]
fn test_reference() -> Result<()> {
    let graph = ErdosRenyi::new(100, 0.05, 4).build();
    let weighted = ErdosRenyi::new(100, 0.05, 4).build_weighted(0.1, 3.0);
    for variant in [
        Variant::PageRank,
        Variant::Weighted,
        Variant::ArticleRank,
        Variant::Eigenvector,
    ] {
        let graph = if variant == Variant::Weighted {
            &weighted
        } else {
            &graph
        };
        for concurrency in [1, 3, 8] {
            for alpha in [0.5, 0.85, 1.0] {
                let ranks = PageRank::new(graph)
                    .variant(variant)
                    .damping_factor(alpha)
                    .tolerance(0.0)
                    .max_iterations(20)
                    .concurrency(concurrency)
                    .min_batch_size(1)
                    .run()?;
                let expected = reference(graph, variant, alpha, &uniform(100), 20, 1.0);
                let distance = l_inf_distance(&expected, ranks.scores());
                assert!(
                    distance < 1E-6,
                    "{variant} concurrency={concurrency} alpha={alpha}: L∞={distance}"
                );
            }
        }
    }
    Ok(())
}

#[test]
fn test_article_rank() -> Result<()> {
    // Average degree 1/2
    let graph = CsrGraph::from_arcs(2, [(0, 1)]);
    let ranks = PageRank::new(&graph).variant(Variant::ArticleRank).run()?;
    assert!((ranks.scores()[0] - 0.075).abs() < 1E-9);
    // 0.075 + 0.85 * 0.075 / (1 + 0.5)
    assert!((ranks.scores()[1] - 0.1175).abs() < 1E-7);
    assert!(ranks.did_converge());
    Ok(())
}

#[test]
fn test_personalized() -> Result<()> {
    // 0 -> 1 -> 2, 3 -> 0
    let graph = CsrGraph::from_arcs(4, [(0, 1), (1, 2), (3, 0)]);
    let ranks = PageRank::new(&graph).source_nodes([0]).run()?;
    let scores = ranks.scores();
    assert!(ranks.did_converge());
    assert!((scores[0] - 0.15).abs() < 1E-7);
    assert!((scores[1] - 0.1275).abs() < 1E-7);
    assert!((scores[2] - 0.108375).abs() < 1E-7);
    assert_eq!(scores[3], 0.0);

    let ranks = PageRank::new(&graph)
        .weighted_source_nodes([(0, 3.0), (3, 1.0)])
        .tolerance(0.0)
        .max_iterations(10)
        .run()?;
    let expected = reference(&graph, Variant::PageRank, 0.85, &[0.75, 0.0, 0.0, 0.25], 10, 1.0);
    assert!(l_inf_distance(&expected, ranks.scores()) < 1E-7);
    Ok(())
}

#[test]
fn test_original_ids() -> Result<()> {
    let mut builder = ArcListBuilder::new();
    builder.add_arcs([(1000, 20), (20, 1000), (20, 7)]);
    let graph = builder.build()?;
    let ranks = PageRank::new(&graph).source_nodes([1000]).run()?;
    let score_1000 = ranks.score_of(&graph, 1000).unwrap();
    let score_7 = ranks.score_of(&graph, 7).unwrap();
    assert!(score_1000 > score_7);
    assert!(score_7 > 0.0);
    assert_eq!(ranks.score_of(&graph, 8), None);
    Ok(())
}

#[test]
fn test_weight_cache() -> Result<()> {
    let mut builder = ArcListBuilder::new();
    let graph = ErdosRenyi::new(150, 0.04, 5).build_weighted(-0.5, 2.0);
    for x in 0..graph.num_nodes() {
        let weights = graph.weights(x).unwrap();
        for (&y, &w) in graph.successors(x).iter().zip(weights) {
            // Leave some weights missing
            if (x + y) % 5 == 0 {
                builder.add_arc(x as u64, y as u64);
            } else {
                builder.add_weighted_arc(x as u64, y as u64, w);
            }
        }
    }
    let graph = builder.build()?;
    for default_weight in [0.5, 2.0] {
        let run = |cache_weights| {
            PageRank::new(&graph)
                .variant(Variant::Weighted)
                .default_weight(default_weight)
                .cache_weights(cache_weights)
                .concurrency(3)
                .min_batch_size(1)
                .run()
        };
        let cached = run(true)?;
        let uncached = run(false)?;
        assert_eq!(cached.ran_iterations(), uncached.ran_iterations());
        assert_eq!(cached.scores(), uncached.scores());
    }
    Ok(())
}

#[test]
fn test_scalers() -> Result<()> {
    let graph = cycle_with_chords(50, 0.05, 6);
    let run = |scaler| PageRank::new(&graph).scaler(scaler).run();

    let max = run(Scaler::Max)?;
    let top = max.scores().iter().copied().fold(0.0, f64::max);
    assert!((top - 1.0).abs() < 1E-12);

    let l1 = run(Scaler::L1Norm)?;
    assert!((l1.scores().iter().sum::<f64>() - 1.0).abs() < 1E-12);

    let l2 = run(Scaler::L2Norm)?;
    assert!((l2.scores().iter().map(|x| x * x).sum::<f64>() - 1.0).abs() < 1E-12);

    let min_max = run(Scaler::MinMax)?;
    let min = min_max.scores().iter().copied().fold(f64::INFINITY, f64::min);
    let max = min_max.scores().iter().copied().fold(0.0, f64::max);
    assert_eq!(min, 0.0);
    assert!((max - 1.0).abs() < 1E-12);
    Ok(())
}

#[test]
fn test_max_iterations() -> Result<()> {
    let graph = cycle_with_chords(100, 0.05, 7);
    let ranks = PageRank::new(&graph).tolerance(0.0).max_iterations(3).run()?;
    assert_eq!(ranks.ran_iterations(), 3);
    assert!(!ranks.did_converge());
    assert_eq!(ranks.termination(), Termination::MaxIterationsReached);
    assert_eq!(ranks.deltas().len(), 3);
    Ok(())
}

#[test]
fn test_logging() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let graph = cycle_with_chords(1000, 0.005, 8);
    let mut pl = dsi_progress_logger::progress_logger![];
    let mut cpl = dsi_progress_logger::concurrent_progress_logger![];
    let ranks = PageRank::new(&graph)
        .concurrency(4)
        .min_batch_size(1)
        .run_with_logging(|| true, &mut pl, &mut cpl)?;
    assert_eq!(ranks.scores().len(), 1000);
    Ok(())
}

#[cfg(feature = "slow_tests")]
#[test]
fn test_large() -> Result<()> {
    let graph = ErdosRenyi::new(5000, 0.002, 9).build();
    let ranks = PageRank::new(&graph)
        .tolerance(0.0)
        .max_iterations(15)
        .min_batch_size(1)
        .run()?;
    let expected = reference(&graph, Variant::PageRank, 0.85, &uniform(5000), 15, 1.0);
    assert!(l_inf_distance(&expected, ranks.scores()) < 1E-7);
    Ok(())
}
