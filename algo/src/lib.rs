/*
 * SPDX-FileCopyrightText: 2026 The rankgraph developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Partitioned parallel PageRank-family centralities.
//!
//! The [`rank`] module contains a [`PageRank`](rank::PageRank) engine
//! computing PageRank, weighted PageRank, ArticleRank and eigenvector
//! centrality on any [`Graph`](rankgraph::traits::Graph), using a
//! [partition](partition)-based scheme in which parallel tasks never write
//! to shared memory: each task accumulates contributions in private
//! per-partition buffers that are [merged](utils::accum) after each
//! iteration.

#![deny(unstable_features)]
#![deny(trivial_casts)]
#![deny(unconditional_recursion)]
#![deny(clippy::empty_loop)]
#![deny(unreachable_code)]
#![deny(unreachable_pub)]
#![deny(unreachable_patterns)]
#![deny(unused_macro_rules)]
#![deny(unused_doc_comments)]

mod error;
pub use error::ConfigError;

pub mod partition;
pub mod rank;
pub mod utils;

pub mod prelude {
    pub use crate::ConfigError;
    pub use crate::partition::{Partition, Partitioning, Partitions};
    pub use crate::rank::{Norm, PageRank, Ranks, Scaler, Termination, Variant};
}
