/*
 * SPDX-FileCopyrightText: 2026 The rankgraph developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Partitioned parallel PageRank and related centralities.
//!
//! This implementation computes PageRank by power iteration using two
//! vectors of doubles (the current approximation and the next one, swapped at
//! each iteration) and never writes to memory shared between threads: the
//! nodes are [partitioned](crate::partition), and at each iteration
//!
//! 1. a [compute step](ComputeStep) per partition scatters the scores of its
//!    nodes along their outgoing arcs into private per-partition
//!    [rows](crate::utils::Rows);
//! 2. for each partition, in parallel, the rows of all steps destined to the
//!    partition are [merged](crate::utils::par_merge) into the next
//!    approximation, damping is applied and the delta with respect to the
//!    current approximation is computed.
//!
//! # The formula
//!
//! If we denote with **v** the _teleport_ vector (uniform, or concentrated
//! on the [source nodes](PageRank::source_nodes)), with α the damping
//! factor, and with *P* the transition matrix defined by the
//! [propagation](super::Propagation) of the chosen [`Variant`], the
//! iteration is
//!
//! > **x**⁽*ᵗ* ⁺ ¹⁾ = (1 − α) **v** + α **x**⁽*ᵗ*⁾ *P*,
//!
//! starting from **x**⁽⁰⁾ = (1 − α) **v** if α < 1, or from
//! **x**⁽⁰⁾ = **v** if α = 1 (in particular, for eigenvector centrality,
//! whose damping factor is always one).
//!
//! Nodes without outgoing arcs (or, in the weighted case, without
//! positively weighted outgoing arcs) do not redistribute their score, so
//! unless α = 1 and there are no such nodes the resulting vector is not
//! stochastic. Use a [`Scaler`] to normalize it.
//!
//! # Stopping criteria
//!
//! The computation stops as soon as the delta between two successive
//! approximations, measured using the chosen [`Norm`], is at most the
//! [tolerance](PageRank::tolerance), or after the [maximum number of
//! iterations](PageRank::max_iterations). It can also be stopped by
//! [cancellation](PageRank::run_cancellable): the iteration in progress is
//! then discarded, and the result contains the last complete approximation.
//!
//! # Determinism
//!
//! Contributions are merged in a fixed order, so the result depends only on
//! the graph, the configuration and the partitions. Since partitions depend
//! on the concurrency, results with different concurrencies may differ in
//! the last digits.

use super::{
    ComputeStep, DegreeCache, Scaler, Variant,
    variant::{DegreeOffset, Proportional, Propagation, Uniform},
};
use crate::{
    ConfigError,
    partition::{DEFAULT_MIN_BATCH_SIZE, MAX_CONCURRENCY, MAX_PARTITION_SIZE, Partitioning, Partitions},
    utils::par_merge,
};
use dsi_progress_logger::{ConcurrentProgressLog, ProgressLog, no_logging};
use kahan::KahanSum;
use rankgraph::traits::{Graph, IdMap};
use rayon::{ThreadPool, prelude::*};
use std::fmt::Display;

/// The norm used to compute the delta between successive approximations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Norm {
    /// The maximum absolute difference (𝓁∞ norm).
    #[default]
    Max,
    /// The sum of absolute differences (𝓁₁ norm).
    L1,
}

impl Display for Norm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Norm::Max => f.write_str("max"),
            Norm::L1 => f.write_str("l1"),
        }
    }
}

/// Why a computation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The delta fell below the tolerance.
    Converged,
    /// The maximum number of iterations was reached.
    MaxIterationsReached,
    /// The cancellation predicate returned false.
    Cancelled,
}

/// The result of a [`PageRank`] computation.
#[derive(Debug, Clone)]
pub struct Ranks {
    scores: Box<[f64]>,
    ran_iterations: usize,
    termination: Termination,
    deltas: Vec<f64>,
}

impl Ranks {
    /// Returns the scores, indexed by dense node identifier.
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Consumes the result, returning the scores.
    pub fn into_scores(self) -> Box<[f64]> {
        self.scores
    }

    /// Returns the score of a node given its original identifier, or `None`
    /// if the node is not part of the graph.
    pub fn score_of(&self, ids: &impl IdMap, original: u64) -> Option<f64> {
        ids.to_mapped(original).map(|node| self.scores[node])
    }

    /// Returns the number of completed iterations.
    pub fn ran_iterations(&self) -> usize {
        self.ran_iterations
    }

    /// Returns whether the computation converged.
    pub fn did_converge(&self) -> bool {
        self.termination == Termination::Converged
    }

    /// Returns why the computation stopped.
    pub fn termination(&self) -> Termination {
        self.termination
    }

    /// Returns the delta of the last completed iteration, if any.
    pub fn delta(&self) -> Option<f64> {
        self.deltas.last().copied()
    }

    /// Returns the deltas of all completed iterations.
    pub fn deltas(&self) -> &[f64] {
        &self.deltas
    }
}

/// Computes PageRank-family centralities using a partitioned parallel
/// power iteration.
///
/// The struct is configured via setters and then executed via
/// [`run`](Self::run), [`run_cancellable`](Self::run_cancellable) or
/// [`run_with_logging`](Self::run_with_logging), which validate the
/// configuration before starting any computation. Unlike in many other
/// implementations, you must pass the graph itself, not its transpose.
///
/// # Examples
///
/// Default PageRank (α = 0.85) on a small graph:
///
/// ```
/// use rankgraph::prelude::*;
/// use rankgraph_algo::prelude::*;
///
/// // 0 → 1, 0 → 2, 1 → 2, 2 → 0, 3 → 0, 4 → 3
/// let graph = CsrGraph::from_arcs(5, [(0, 1), (0, 2), (1, 2), (2, 0), (3, 0), (4, 3)]);
///
/// let ranks = PageRank::new(&graph)
///     .tolerance(1E-6)
///     .max_iterations(100)
///     .run()?;
///
/// assert!(ranks.did_converge());
/// assert!(ranks.scores()[0] > ranks.scores()[4]);
/// # Ok::<(), ConfigError>(())
/// ```
///
/// ArticleRank personalized on node 4, with scores normalized to sum one:
///
/// ```
/// use rankgraph::prelude::*;
/// use rankgraph_algo::prelude::*;
///
/// let graph = CsrGraph::from_arcs(5, [(0, 1), (0, 2), (1, 2), (2, 0), (3, 0), (4, 3)]);
///
/// let ranks = PageRank::new(&graph)
///     .variant(Variant::ArticleRank)
///     .source_nodes([4])
///     .scaler(Scaler::L1Norm)
///     .run()?;
///
/// assert!((ranks.scores().iter().sum::<f64>() - 1.0).abs() < 1E-9);
/// assert!(ranks.score_of(&graph, 4).unwrap() > ranks.score_of(&graph, 1).unwrap());
/// # Ok::<(), ConfigError>(())
/// ```
pub struct PageRank<'a, G: Graph + Send> {
    graph: &'a G,
    variant: Variant,
    damping_factor: f64,
    tolerance: f64,
    max_iterations: usize,
    norm: Norm,
    concurrency: usize,
    partitioning: Partitioning,
    min_batch_size: usize,
    max_partition_size: usize,
    source_nodes: Vec<(u64, f64)>,
    cache_weights: bool,
    default_weight: f64,
    scaler: Scaler,
}

impl<G: Graph + Send> std::fmt::Debug for PageRank<'_, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRank")
            .field("variant", &self.variant)
            .field("damping_factor", &self.damping_factor)
            .field("tolerance", &self.tolerance)
            .field("max_iterations", &self.max_iterations)
            .field("norm", &self.norm)
            .field("concurrency", &self.concurrency)
            .field("partitioning", &self.partitioning)
            .field("num_sources", &self.source_nodes.len())
            .field("cache_weights", &self.cache_weights)
            .field("default_weight", &self.default_weight)
            .field("scaler", &self.scaler)
            .finish_non_exhaustive()
    }
}

impl<'a, G: Graph + Send> PageRank<'a, G> {
    pub const DEFAULT_DAMPING_FACTOR: f64 = 0.85;
    pub const DEFAULT_TOLERANCE: f64 = 1E-7;
    pub const DEFAULT_MAX_ITERATIONS: usize = 20;
    pub const DEFAULT_WEIGHT: f64 = 1.0;

    /// Creates a new computation on the given graph with default settings.
    ///
    /// The default concurrency is the number of available CPUs.
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            variant: Variant::default(),
            damping_factor: Self::DEFAULT_DAMPING_FACTOR,
            tolerance: Self::DEFAULT_TOLERANCE,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            norm: Norm::default(),
            concurrency: num_cpus::get().clamp(1, MAX_CONCURRENCY),
            partitioning: Partitioning::default(),
            min_batch_size: DEFAULT_MIN_BATCH_SIZE,
            max_partition_size: MAX_PARTITION_SIZE,
            source_nodes: Vec::new(),
            cache_weights: false,
            default_weight: Self::DEFAULT_WEIGHT,
            scaler: Scaler::default(),
        }
    }

    /// Sets the centrality to compute.
    pub fn variant(&mut self, variant: Variant) -> &mut Self {
        self.variant = variant;
        self
    }

    /// Sets the damping factor α, which must be in (0 . . 1].
    ///
    /// It is ignored by [eigenvector centrality](Variant::Eigenvector).
    pub fn damping_factor(&mut self, damping_factor: f64) -> &mut Self {
        self.damping_factor = damping_factor;
        self
    }

    /// Sets the tolerance, which must be nonnegative.
    pub fn tolerance(&mut self, tolerance: f64) -> &mut Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum number of iterations, which must be positive.
    pub fn max_iterations(&mut self, max_iterations: usize) -> &mut Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the norm used to compute deltas.
    pub fn norm(&mut self, norm: Norm) -> &mut Self {
        self.norm = norm;
        self
    }

    /// Sets the number of threads, which is also the target number of
    /// partitions.
    pub fn concurrency(&mut self, concurrency: usize) -> &mut Self {
        self.concurrency = concurrency;
        self
    }

    /// Sets the partitioning strategy.
    pub fn partitioning(&mut self, partitioning: Partitioning) -> &mut Self {
        self.partitioning = partitioning;
        self
    }

    /// Sets the minimum batch size of partitions (nodes for
    /// [range](Partitioning::Range) partitioning, arcs for [degree](Partitioning::ByDegree)
    /// partitioning).
    ///
    /// Small values are useful to test parallelism on small graphs.
    pub fn min_batch_size(&mut self, min_batch_size: usize) -> &mut Self {
        self.min_batch_size = min_batch_size;
        self
    }

    /// Sets the maximum number of nodes of a partition.
    pub fn max_partition_size(&mut self, max_partition_size: usize) -> &mut Self {
        self.max_partition_size = max_partition_size;
        self
    }

    /// Sets the source nodes (by original identifier) on which the teleport
    /// vector is uniformly concentrated.
    ///
    /// An empty set of source nodes yields a uniform teleport vector.
    pub fn source_nodes(&mut self, source_nodes: impl IntoIterator<Item = u64>) -> &mut Self {
        self.source_nodes = source_nodes.into_iter().map(|node| (node, 1.0)).collect();
        self
    }

    /// Sets the source nodes (by original identifier) together with their
    /// seed weights; the teleport vector is concentrated on the source nodes
    /// proportionally to their weights.
    ///
    /// Weights must be nonnegative and finite, and at least one must be
    /// positive.
    pub fn weighted_source_nodes(
        &mut self,
        source_nodes: impl IntoIterator<Item = (u64, f64)>,
    ) -> &mut Self {
        self.source_nodes = source_nodes.into_iter().collect();
        self
    }

    /// Sets whether resolved arc weights should be cached by [weighted
    /// PageRank](Variant::Weighted).
    ///
    /// Caching weights uses eight bytes per arc, but avoids resolving
    /// weights through the graph at each iteration.
    pub fn cache_weights(&mut self, cache_weights: bool) -> &mut Self {
        self.cache_weights = cache_weights;
        self
    }

    /// Sets the weight of arcs without a weight in [weighted
    /// PageRank](Variant::Weighted).
    pub fn default_weight(&mut self, default_weight: f64) -> &mut Self {
        self.default_weight = default_weight;
        self
    }

    /// Sets the post-processing of final scores.
    pub fn scaler(&mut self, scaler: Scaler) -> &mut Self {
        self.scaler = scaler;
        self
    }

    /// Runs the computation.
    pub fn run(&self) -> Result<Ranks, ConfigError> {
        self.run_with_logging(|| true, no_logging![], no_logging![])
    }

    /// Runs the computation, stopping it as soon as `running` returns false.
    ///
    /// The predicate is checked before each iteration, and periodically by
    /// each parallel task during an iteration.
    pub fn run_cancellable(
        &self,
        running: impl Fn() -> bool + Sync,
    ) -> Result<Ranks, ConfigError> {
        self.run_with_logging(running, no_logging![], no_logging![])
    }

    /// Runs the computation, logging progress.
    ///
    /// `pl` is a sequential [`ProgressLog`] counting iterations. `cpl` is a
    /// [`ConcurrentProgressLog`] used for node-level progress while
    /// computing degrees and inside each iteration. Their options will be
    /// preserved, making thus possible to customize the logs.
    ///
    /// It is possible to specify either `pl` or `cpl` as
    /// [`no_logging![]`](dsi_progress_logger::no_logging) if you don't want
    /// to log the corresponding part of the computation.
    pub fn run_with_logging(
        &self,
        running: impl Fn() -> bool + Sync,
        pl: &mut impl ProgressLog,
        cpl: &mut impl ConcurrentProgressLog,
    ) -> Result<Ranks, ConfigError> {
        self.validate()?;
        let teleport = self.teleport()?;

        let graph = self.graph;
        let num_nodes = graph.num_nodes();
        let partitions = match self.partitioning {
            Partitioning::Range => Partitions::range(
                num_nodes,
                self.concurrency,
                self.min_batch_size,
                self.max_partition_size,
            ),
            Partitioning::ByDegree => Partitions::by_degree(
                num_nodes,
                graph.num_arcs(),
                |node| graph.outdegree(node) as u64,
                self.concurrency,
                self.min_batch_size,
                self.max_partition_size,
            ),
        }?;

        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.concurrency)
            .build()
            .map_err(|e| ConfigError::ThreadPool {
                concurrency: self.concurrency,
                message: e.to_string(),
            })?;

        log::info!("Variant: {}", self.variant);
        log::info!("Damping factor: {}", self.damping_factor);
        log::info!("Tolerance: {} ({} norm)", self.tolerance, self.norm);
        log::info!("Maximum number of iterations: {}", self.max_iterations);
        if self.source_nodes.is_empty() {
            log::info!("Teleport: uniform");
        } else {
            log::info!("Teleport: {} source nodes", self.source_nodes.len());
        }
        log::info!(
            "{} partitions ({}) on {} threads",
            partitions.len(),
            self.partitioning,
            self.concurrency
        );

        if num_nodes == 0 {
            return Ok(Ranks {
                scores: Box::default(),
                ran_iterations: 0,
                termination: Termination::Converged,
                deltas: Vec::new(),
            });
        }

        let weighted = self.variant.is_weighted();
        let degrees = DegreeCache::build(
            graph,
            &partitions,
            weighted,
            self.default_weight,
            self.cache_weights,
            &thread_pool,
            cpl,
        );
        log::info!("{} sinks", degrees.num_sinks());

        let mut ranks = match self.variant {
            Variant::PageRank => self.iterate(
                Uniform,
                self.damping_factor,
                &teleport,
                &partitions,
                &degrees,
                &thread_pool,
                &running,
                pl,
                cpl,
            ),
            Variant::Weighted => self.iterate(
                Proportional,
                self.damping_factor,
                &teleport,
                &partitions,
                &degrees,
                &thread_pool,
                &running,
                pl,
                cpl,
            ),
            Variant::ArticleRank => {
                let average_degree = degrees.average_degree();
                log::info!("Average degree: {}", average_degree);
                self.iterate(
                    DegreeOffset { average_degree },
                    self.damping_factor,
                    &teleport,
                    &partitions,
                    &degrees,
                    &thread_pool,
                    &running,
                    pl,
                    cpl,
                )
            }
            Variant::Eigenvector => self.iterate(
                Uniform,
                1.0,
                &teleport,
                &partitions,
                &degrees,
                &thread_pool,
                &running,
                pl,
                cpl,
            ),
        };

        self.scaler.scale(&mut ranks.scores);
        Ok(ranks)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        // Written so that NaN fails
        if !(self.damping_factor > 0.0 && self.damping_factor <= 1.0) {
            return Err(ConfigError::DampingFactor(self.damping_factor));
        }
        if !(self.tolerance >= 0.0) {
            return Err(ConfigError::Tolerance(self.tolerance));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::MaxIterations);
        }
        if self.variant.is_weighted() && !self.graph.has_weights() {
            return Err(ConfigError::MissingWeights(self.variant));
        }
        Ok(())
    }

    /// Returns the teleport vector, checking the source nodes.
    fn teleport(&self) -> Result<Box<[f64]>, ConfigError> {
        let num_nodes = self.graph.num_nodes();
        if self.source_nodes.is_empty() {
            return Ok(vec![1.0 / num_nodes as f64; num_nodes].into_boxed_slice());
        }

        let mut teleport = vec![0.0; num_nodes].into_boxed_slice();
        let mut seen = vec![false; num_nodes];
        let mut mass = KahanSum::<f64>::new();
        for &(original, weight) in &self.source_nodes {
            if !(weight >= 0.0 && weight.is_finite()) {
                return Err(ConfigError::SeedWeight {
                    node: original,
                    weight,
                });
            }
            let node = self
                .graph
                .to_mapped(original)
                .ok_or(ConfigError::UnknownSourceNode(original))?;
            if seen[node] {
                return Err(ConfigError::DuplicateSourceNode(original));
            }
            seen[node] = true;
            teleport[node] = weight;
            mass += weight;
        }

        let mass = mass.sum();
        if mass == 0.0 {
            return Err(ConfigError::ZeroSeedMass);
        }
        for x in teleport.iter_mut() {
            *x /= mass;
        }
        Ok(teleport)
    }

    #[allow(clippy::too_many_arguments)]
    fn iterate<P: Propagation>(
        &self,
        propagation: P,
        alpha: f64,
        teleport: &[f64],
        partitions: &Partitions,
        degrees: &DegreeCache,
        thread_pool: &ThreadPool,
        running: &(impl Fn() -> bool + Sync),
        pl: &mut impl ProgressLog,
        cpl: &mut impl ConcurrentProgressLog,
    ) -> Ranks {
        let num_nodes = teleport.len();
        let norm = self.norm;
        let default_weight = self.default_weight;

        let mut current: Box<[f64]> = if alpha < 1.0 {
            teleport.iter().map(|&v| (1.0 - alpha) * v).collect()
        } else {
            Box::<[f64]>::from(teleport)
        };
        let mut next = vec![0.0; num_nodes].into_boxed_slice();

        let mut steps = (0..partitions.len())
            .map(|index| ComputeStep::new(index, self.graph.concurrent_copy(), partitions))
            .collect::<Vec<_>>();

        let mut termination = Termination::MaxIterationsReached;
        let mut deltas = Vec::new();

        pl.item_name("iteration");
        pl.expected_updates(Some(self.max_iterations));
        pl.start(format!(
            "Computing {} (alpha={alpha}, {} partitions)...",
            self.variant,
            partitions.len()
        ));

        while deltas.len() < self.max_iterations {
            if !running() {
                termination = Termination::Cancelled;
                break;
            }

            cpl.item_name("node");
            cpl.expected_updates(Some(num_nodes));
            cpl.start(format!("Iteration {}...", deltas.len() + 1));

            let task_cpl = cpl.clone();
            let completed = thread_pool.install(|| {
                steps.par_iter_mut().map_with(task_cpl, |cpl, step| {
                    step.run_iteration(
                        &current,
                        degrees,
                        partitions,
                        propagation,
                        default_weight,
                        running,
                        cpl,
                    )
                })
                .all(|completed| completed)
            });

            cpl.done();

            if !completed {
                termination = Termination::Cancelled;
                break;
            }

            let rows = steps.iter().map(ComputeStep::rows).collect::<Vec<_>>();
            let partial_deltas = par_merge(
                &mut next,
                partitions,
                &rows,
                thread_pool,
                |part, merged| {
                    let current = &current[part.range()];
                    let teleport = &teleport[part.range()];
                    let mut max = 0.0_f64;
                    let mut sum = KahanSum::<f64>::new();
                    for ((x, &v), &c) in merged.iter_mut().zip(teleport).zip(current) {
                        *x = (1.0 - alpha) * v + alpha * *x;
                        let diff = (*x - c).abs();
                        max = max.max(diff);
                        sum += diff;
                    }
                    match norm {
                        Norm::Max => max,
                        Norm::L1 => sum.sum(),
                    }
                },
            );
            let delta = match norm {
                Norm::Max => partial_deltas.into_iter().fold(0.0, f64::max),
                Norm::L1 => partial_deltas
                    .into_iter()
                    .fold(KahanSum::<f64>::new(), |sum, d| sum + d)
                    .sum(),
            };

            std::mem::swap(&mut current, &mut next);
            deltas.push(delta);

            log::info!("Iteration {}: delta = {}", deltas.len(), delta);
            pl.update_and_display();

            if delta <= self.tolerance {
                termination = Termination::Converged;
                break;
            }
        }

        pl.done();

        match termination {
            Termination::Converged => pl.info(format_args!(
                "Converged after {} iteration(s)",
                deltas.len()
            )),
            Termination::MaxIterationsReached => pl.info(format_args!(
                "Stopped after {} iteration(s) without converging",
                deltas.len()
            )),
            Termination::Cancelled => pl.info(format_args!(
                "Cancelled after {} complete iteration(s)",
                deltas.len()
            )),
        }

        Ranks {
            scores: current,
            ran_iterations: deltas.len(),
            termination,
            deltas,
        }
    }
}
