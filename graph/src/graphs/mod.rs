/*
 * SPDX-FileCopyrightText: 2026 The rankgraph developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! In-memory graph implementations.

pub mod arc_list;
pub mod csr_graph;
pub mod id_mapping;
pub mod random;

pub mod prelude {
    pub use super::arc_list::{ArcListBuilder, IdOrder};
    pub use super::csr_graph::CsrGraph;
    pub use super::id_mapping::IdMapping;
    pub use super::random::ErdosRenyi;
}
