/*
 * SPDX-FileCopyrightText: 2026 The rankgraph developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! PageRank-family centralities.

mod degrees;
pub use degrees::DegreeCache;

pub mod variant;
pub use variant::{Propagation, Variant};

mod step;
pub use step::{CANCEL_CHECK_INTERVAL, ComputeStep};

mod scaler;
pub use scaler::Scaler;

pub mod pagerank;
pub use pagerank::{Norm, PageRank, Ranks, Termination};
