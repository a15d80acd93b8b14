/*
 * SPDX-FileCopyrightText: 2026 The rankgraph developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Read-only graph abstractions for partitioned score-propagation
//! algorithms.
//!
//! Algorithms in `rankgraph-algo` never look at the storage layer directly:
//! they consume a [`Graph`](traits::Graph), which provides node counts,
//! out-degrees, optional relationship weights, per-node arc visits, and
//! [concurrent copies](traits::Graph::concurrent_copy) that can be handed
//! to a worker thread. Node identifiers are dense (`0..num_nodes`); the
//! [`IdMap`](traits::IdMap) trait translates them from and to the
//! identifiers of the outside world.
//!
//! The [`graphs`] module contains an in-memory [CSR
//! graph](graphs::csr_graph::CsrGraph), a [builder](graphs::arc_list::ArcListBuilder)
//! working on original identifiers, and [random graphs](graphs::random).

#![deny(unstable_features)]
#![deny(trivial_casts)]
#![deny(unconditional_recursion)]
#![deny(clippy::empty_loop)]
#![deny(unreachable_code)]
#![deny(unreachable_pub)]
#![deny(unreachable_patterns)]
#![deny(unused_macro_rules)]
#![deny(unused_doc_comments)]

pub mod graphs;
pub mod traits;
pub mod utils;

/// Prelude module to import everything from this crate.
pub mod prelude {
    pub use crate::graphs::prelude::*;
    pub use crate::traits::*;
    pub use crate::utils::*;
}
