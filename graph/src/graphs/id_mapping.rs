/*
 * SPDX-FileCopyrightText: 2026 The rankgraph developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::traits::IdMap;

/// An explicit mapping between dense node identifiers and original
/// identifiers.
///
/// The mapping stores the original identifier of each dense node, and the
/// same pairs sorted by original identifier, so that both directions are
/// answered without hashing: [`to_original`](IdMap::to_original) is an array
/// access, [`to_mapped`](IdMap::to_mapped) a binary search.
///
/// The [identity](IdMapping::identity) mapping uses no memory.
#[derive(Debug, Clone)]
pub enum IdMapping {
    /// Original identifiers coincide with dense identifiers.
    Identity(usize),
    /// Arbitrary distinct original identifiers.
    Explicit {
        originals: Box<[u64]>,
        sorted: Box<[(u64, usize)]>,
    },
}

impl IdMapping {
    /// Returns the identity mapping on `num_nodes` nodes.
    pub fn identity(num_nodes: usize) -> Self {
        Self::Identity(num_nodes)
    }

    /// Builds a mapping from the original identifiers of the dense nodes
    /// 0, 1, 2, ….
    ///
    /// # Panics
    ///
    /// Panics if the original identifiers are not distinct.
    pub fn from_originals(originals: impl Into<Box<[u64]>>) -> Self {
        let originals = originals.into();
        let mut sorted = originals
            .iter()
            .enumerate()
            .map(|(node, &original)| (original, node))
            .collect::<Vec<_>>();
        sorted.sort_unstable();
        assert!(
            sorted.windows(2).all(|w| w[0].0 != w[1].0),
            "Original identifiers must be distinct"
        );
        Self::Explicit {
            originals,
            sorted: sorted.into_boxed_slice(),
        }
    }
}

impl IdMap for IdMapping {
    fn num_nodes(&self) -> usize {
        match self {
            Self::Identity(n) => *n,
            Self::Explicit { originals, .. } => originals.len(),
        }
    }

    fn to_mapped(&self, original: u64) -> Option<usize> {
        match self {
            Self::Identity(n) => usize::try_from(original).ok().filter(|node| node < n),
            Self::Explicit { sorted, .. } => sorted
                .binary_search_by_key(&original, |&(o, _)| o)
                .ok()
                .map(|pos| sorted[pos].1),
        }
    }

    fn to_original(&self, node: usize) -> u64 {
        match self {
            Self::Identity(n) => {
                assert!(node < *n, "Node {node} out of range (num nodes: {n})");
                node as u64
            }
            Self::Explicit { originals, .. } => originals[node],
        }
    }
}
