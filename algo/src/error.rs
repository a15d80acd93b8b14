/*
 * SPDX-FileCopyrightText: 2026 The rankgraph developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::rank::Variant;
use thiserror::Error;

/// Errors in the configuration of a computation.
///
/// These errors are always reported before any computation takes place.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The damping factor is not in (0 . . 1].
    #[error("The damping factor must be in (0 . . 1], got {0}")]
    DampingFactor(f64),

    /// The tolerance is negative or NaN.
    #[error("The tolerance must be nonnegative, got {0}")]
    Tolerance(f64),

    /// The maximum number of iterations is zero.
    #[error("The maximum number of iterations must be positive")]
    MaxIterations,

    /// The concurrency is zero or too large.
    #[error("Invalid concurrency {concurrency}: it must be in [1 . . {max}]")]
    Concurrency { concurrency: usize, max: usize },

    /// The concurrency (or the maximum partition size) yields too many partitions.
    #[error(
        "Concurrency {concurrency} yields {partitions} partitions, more than the supported {max}"
    )]
    TooManyPartitions {
        concurrency: usize,
        partitions: usize,
        max: usize,
    },

    /// The maximum partition size is zero.
    #[error("The maximum partition size must be positive")]
    MaxPartitionSize,

    /// The thread pool could not be created.
    #[error("Cannot create a thread pool with {concurrency} threads: {message}")]
    ThreadPool { concurrency: usize, message: String },

    /// A source node is not part of the graph.
    #[error("Source node {0} is not part of the graph")]
    UnknownSourceNode(u64),

    /// A source node has been specified more than once.
    #[error("Source node {0} has been specified more than once")]
    DuplicateSourceNode(u64),

    /// A source node has a negative or NaN seed weight.
    #[error("Source node {node} has invalid seed weight {weight}")]
    SeedWeight { node: u64, weight: f64 },

    /// The seed weights of the source nodes sum to zero.
    #[error("The seed weights of the source nodes sum to zero")]
    ZeroSeedMass,

    /// A weighted variant has been requested on a graph without weights.
    #[error("The {0} variant requires a graph with relationship weights")]
    MissingWeights(Variant),
}
