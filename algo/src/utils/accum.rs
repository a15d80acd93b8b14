/*
 * SPDX-FileCopyrightText: 2026 The rankgraph developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Partitioned accumulation.
//!
//! Partitioned algorithms scatter values to arbitrary nodes from parallel
//! tasks without sharing any mutable memory: each task owns a set of
//! [`Rows`], one row per partition, in which it accumulates the values
//! destined to the nodes of that partition. Once all tasks are done,
//! [`par_merge`] gathers, for each partition in parallel, the corresponding
//! row of every task into the slice of a target array owned by the
//! partition.
//!
//! Rows contain single-precision floats, halving the memory (and the memory
//! bandwidth) of the buffers, which are quadratic in the number of
//! partitions; the target array contains double-precision floats.
//!
//! Since rows are summed in the order in which they are passed to
//! [`par_merge`], results depend only on the partitions, and not on the
//! scheduling of parallel tasks.

use crate::partition::{Partition, Partitions};
use rayon::{ThreadPool, prelude::*};

/// Per-task accumulation buffers, one row per partition.
#[derive(Debug, Clone)]
pub struct Rows {
    rows: Box<[Box<[f32]>]>,
}

impl Rows {
    /// Creates zeroed rows sized as the given partitions.
    pub fn new(partitions: &Partitions) -> Self {
        Self {
            rows: partitions
                .iter()
                .map(|part| vec![0.0; part.len].into_boxed_slice())
                .collect(),
        }
    }

    /// Zeroes all rows.
    pub fn clear(&mut self) {
        for row in self.rows.iter_mut() {
            row.fill(0.0);
        }
    }

    /// Adds `value` to position `offset` of row `part`.
    #[inline(always)]
    pub fn add(&mut self, part: usize, offset: usize, value: f32) {
        self.rows[part][offset] += value;
    }

    /// Returns a row.
    #[inline(always)]
    pub fn row(&self, part: usize) -> &[f32] {
        &self.rows[part]
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Merges rows into a target array, in parallel over partitions.
///
/// For each partition `q`, the slice of `target` owned by `q` is overwritten
/// with the sum of the rows of index `q` of `sources`, in the order of
/// `sources`; then `finish` is called on the partition and the merged
/// slice. The results of `finish` are returned in partition order.
///
/// # Panics
///
/// Panics if the length of `target` is not the number of nodes covered by
/// `partitions`, or if some rows are not sized as `partitions`.
pub fn par_merge<A: Send>(
    target: &mut [f64],
    partitions: &Partitions,
    sources: &[&Rows],
    thread_pool: &ThreadPool,
    finish: impl Fn(Partition, &mut [f64]) -> A + Sync,
) -> Vec<A> {
    let slices = partitions.split_mut(target);
    thread_pool.install(|| {
        slices
            .into_par_iter()
            .zip(partitions.parts().par_iter())
            .enumerate()
            .map(|(q, (slice, &part))| {
                slice.fill(0.0);
                for rows in sources {
                    let row = rows.row(q);
                    assert_eq!(row.len(), slice.len());
                    for (t, &value) in slice.iter_mut().zip(row) {
                        *t += value as f64;
                    }
                }
                finish(part, slice)
            })
            .collect()
    })
}
