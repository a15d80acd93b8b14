/*
 * SPDX-FileCopyrightText: 2026 The rankgraph developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Utilities shared by partitioned algorithms.

pub mod accum;
pub use accum::{Rows, par_merge};
