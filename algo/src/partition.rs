/*
 * SPDX-FileCopyrightText: 2026 The rankgraph developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Partitioning of the node-identifier space.
//!
//! A [`Partitions`] instance is an ordered, gap-free cover of
//! [0 . . *n*) by nonempty contiguous [`Partition`]s. Partitions are the
//! unit of parallel work of partitioned algorithms, and also the unit of
//! ownership of partitioned arrays: the partition owning a node is found by
//! binary search on the (immutable) sequence of starting nodes.
//!
//! There are two strategies:
//!
//! - [by range](Partitions::range): all partitions but the last have the
//!   same number of nodes;
//! - [by degree](Partitions::by_degree): partitions are grown until they
//!   contain approximately the same number of arcs, so that parallel tasks
//!   visiting the arcs of a partition run in approximately the same time
//!   even in the presence of nodes of very large outdegree.
//!
//! Both strategies are deterministic, and both never create partitions
//! larger than a given maximum size, which is used to bound the size of
//! per-partition buffers.

use crate::ConfigError;
use std::ops::Range;

/// The maximum supported concurrency.
pub const MAX_CONCURRENCY: usize = 1 << 10;

/// The maximum supported number of partitions.
///
/// Partitioned algorithms keep, for each partition, one buffer per
/// destination partition, so the number of buffers is quadratic in the
/// number of partitions.
pub const MAX_PARTITIONS: usize = 1 << 12;

/// The maximum number of bytes of a single per-partition buffer.
pub const MAX_PARTITION_BYTES: usize = 1 << 31;

/// The maximum number of nodes of a partition, given that per-partition
/// buffers contain single-precision floats.
pub const MAX_PARTITION_SIZE: usize = MAX_PARTITION_BYTES / size_of::<f32>();

/// The default minimum batch size (in nodes for range partitioning, in arcs
/// for degree partitioning).
pub const DEFAULT_MIN_BATCH_SIZE: usize = 10_000;

/// The fraction of the batch size under which a partition is considered too
/// small to be closed.
const MIN_PARTITION_CAPACITY: f64 = 0.67;

/// The fraction of the batch size under which the last partition is merged
/// into the previous one.
const MIN_LAST_PARTITION_CAPACITY: f64 = 0.2;

/// A contiguous range of nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    /// The first node of the partition.
    pub start: usize,
    /// The number of nodes of the partition.
    pub len: usize,
}

impl Partition {
    /// Returns the node following the last node of the partition.
    #[inline(always)]
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Returns the range of nodes of the partition.
    #[inline(always)]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }
}

/// The strategy used to build [`Partitions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Partitioning {
    /// See [`Partitions::range`].
    Range,
    /// See [`Partitions::by_degree`].
    #[default]
    ByDegree,
}

impl core::fmt::Display for Partitioning {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Partitioning::Range => f.write_str("range"),
            Partitioning::ByDegree => f.write_str("by degree"),
        }
    }
}

/// An ordered cover of [0 . . *n*) by nonempty contiguous partitions.
#[derive(Debug, Clone)]
pub struct Partitions {
    parts: Box<[Partition]>,
    /// The starting node of each partition, for binary searches.
    starts: Box<[usize]>,
    num_nodes: usize,
}

fn check_concurrency(concurrency: usize) -> Result<(), ConfigError> {
    if concurrency == 0 || concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Concurrency {
            concurrency,
            max: MAX_CONCURRENCY,
        });
    }
    Ok(())
}

impl Partitions {
    fn new(
        parts: Vec<Partition>,
        num_nodes: usize,
        concurrency: usize,
    ) -> Result<Self, ConfigError> {
        if parts.len() > MAX_PARTITIONS {
            return Err(ConfigError::TooManyPartitions {
                concurrency,
                partitions: parts.len(),
                max: MAX_PARTITIONS,
            });
        }
        debug_assert_eq!(parts.iter().map(|p| p.len).sum::<usize>(), num_nodes);
        debug_assert!(parts.windows(2).all(|w| w[0].end() == w[1].start));
        debug_assert!(parts.iter().all(|p| p.len > 0));
        let starts = parts.iter().map(|p| p.start).collect();
        Ok(Self {
            parts: parts.into_boxed_slice(),
            starts,
            num_nodes,
        })
    }

    /// Partitions [0 . . `num_nodes`) in ranges of the same size.
    ///
    /// The size of the ranges is ⌈`num_nodes` / `concurrency`⌉, but at least
    /// `min_batch_size` and at most `max_partition_size`. The last partition
    /// contains the remaining nodes.
    pub fn range(
        num_nodes: usize,
        concurrency: usize,
        min_batch_size: usize,
        max_partition_size: usize,
    ) -> Result<Self, ConfigError> {
        check_concurrency(concurrency)?;
        if max_partition_size == 0 {
            return Err(ConfigError::MaxPartitionSize);
        }
        let batch_size = num_nodes
            .div_ceil(concurrency)
            .max(min_batch_size)
            .clamp(1, max_partition_size);

        let parts = (0..num_nodes)
            .step_by(batch_size)
            .map(|start| Partition {
                start,
                len: batch_size.min(num_nodes - start),
            })
            .collect();

        Self::new(parts, num_nodes, concurrency)
    }

    /// Partitions [0 . . `num_nodes`) in ranges containing approximately the
    /// same number of arcs.
    ///
    /// The target number of arcs of a partition (the _batch size_) is
    /// ⌈`num_arcs` / `concurrency`⌉, but at least `min_batch_size`. Nodes are
    /// added to a partition until adding the next node would exceed the batch
    /// size, unless the partition contains less than two thirds of the batch
    /// size, or the partition contains `max_partition_size` nodes. If the
    /// last partition contains less than a fifth of the batch size, it is
    /// merged with the previous one (if the result is not too large).
    ///
    /// `degree` must return the outdegree of a node, and `num_arcs` must be
    /// the sum of all outdegrees.
    pub fn by_degree(
        num_nodes: usize,
        num_arcs: u64,
        degree: impl Fn(usize) -> u64,
        concurrency: usize,
        min_batch_size: usize,
        max_partition_size: usize,
    ) -> Result<Self, ConfigError> {
        check_concurrency(concurrency)?;
        if max_partition_size == 0 {
            return Err(ConfigError::MaxPartitionSize);
        }

        let batch_size = num_arcs
            .div_ceil(concurrency as u64)
            .max(min_batch_size as u64)
            .max(1);
        let min_partition_arcs = (batch_size as f64 * MIN_PARTITION_CAPACITY).round() as u64;

        // Partitions, with their number of arcs
        let mut parts: Vec<(Partition, u64)> = Vec::new();
        let mut start = 0;
        while start < num_nodes {
            let mut arcs = 0;
            let mut end = start;
            while end < num_nodes && end - start < max_partition_size {
                let d = degree(end);
                if arcs + d > batch_size && arcs >= min_partition_arcs {
                    break;
                }
                arcs += d;
                end += 1;
            }
            parts.push((
                Partition {
                    start,
                    len: end - start,
                },
                arcs,
            ));
            start = end;
        }

        // The loop above never leaves a small partition behind, except
        // possibly the last one
        let min_last_partition_arcs =
            (batch_size as f64 * MIN_LAST_PARTITION_CAPACITY).round() as u64;
        let num_parts = parts.len();
        if num_parts > 1 {
            let (prev, prev_arcs) = parts[num_parts - 2];
            let (last, last_arcs) = parts[num_parts - 1];
            if last_arcs < min_last_partition_arcs && prev.len + last.len <= max_partition_size {
                parts.truncate(num_parts - 2);
                parts.push((
                    Partition {
                        start: prev.start,
                        len: prev.len + last.len,
                    },
                    prev_arcs + last_arcs,
                ));
            }
        }

        Self::new(
            parts.into_iter().map(|(p, _)| p).collect(),
            num_nodes,
            concurrency,
        )
    }

    /// Returns the number of partitions.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Returns whether there are no partitions (which happens if and only
    /// if there are no nodes).
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Returns the number of nodes covered by the partitions.
    #[inline(always)]
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Returns the partitions.
    #[inline(always)]
    pub fn parts(&self) -> &[Partition] {
        &self.parts
    }

    /// Returns the starting nodes of the partitions.
    #[inline(always)]
    pub fn starts(&self) -> &[usize] {
        &self.starts
    }

    /// Returns an iterator over the partitions.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Partition> + '_ {
        self.parts.iter()
    }

    /// Returns the index of the partition containing a node.
    ///
    /// # Panics
    ///
    /// Panics in test mode if `node` is not covered by the partitions.
    #[inline(always)]
    pub fn owner(&self, node: usize) -> usize {
        debug_assert!(node < self.num_nodes);
        self.starts.partition_point(|&start| start <= node) - 1
    }

    /// Splits a slice indexed by node into one subslice per partition.
    ///
    /// # Panics
    ///
    /// Panics if the length of the slice is not the number of nodes.
    pub fn split_mut<'a, T>(&self, mut slice: &'a mut [T]) -> Vec<&'a mut [T]> {
        assert_eq!(
            slice.len(),
            self.num_nodes,
            "The slice length ({}) does not match the number of nodes ({})",
            slice.len(),
            self.num_nodes
        );
        let mut result = Vec::with_capacity(self.len());
        for part in self.parts.iter() {
            let (head, tail) = slice.split_at_mut(part.len);
            result.push(head);
            slice = tail;
        }
        result
    }
}
