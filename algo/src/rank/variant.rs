/*
 * SPDX-FileCopyrightText: 2026 The rankgraph developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Propagation semantics.
//!
//! At each iteration every node with positive score sends part of its score
//! along its outgoing arcs. How much is sent is decided by a
//! [`Propagation`] strategy in two steps: first the node computes a _unit_
//! from its score and its [degree](super::DegreeCache), then each arc
//! carries a contribution computed from the unit and the (resolved) weight
//! of the arc.
//!
//! The strategy is selected once per run by a [`Variant`]; the iteration
//! loop is then monomorphized on the strategy.

use std::fmt::Display;

/// A strategy distributing the score of a node along its outgoing arcs.
pub trait Propagation: Copy + Send + Sync {
    /// Whether arc weights must be resolved (and cached degrees are sums of
    /// weights).
    const WEIGHTED: bool;

    /// Returns the unit a node with the given score and degree sends, or
    /// `None` if the node cannot send anything.
    fn unit(&self, score: f64, degree: f64) -> Option<f64>;

    /// Returns the contribution carried by an arc of the given weight.
    fn along(&self, unit: f64, weight: f64) -> f64;
}

/// Splits the score uniformly among the outgoing arcs.
///
/// This is the propagation of PageRank and of eigenvector centrality.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uniform;

impl Propagation for Uniform {
    const WEIGHTED: bool = false;

    #[inline(always)]
    fn unit(&self, score: f64, degree: f64) -> Option<f64> {
        (degree > 0.0).then(|| score / degree)
    }

    #[inline(always)]
    fn along(&self, unit: f64, _weight: f64) -> f64 {
        unit
    }
}

/// Splits the score among the outgoing arcs proportionally to their weights.
///
/// Arcs with a nonpositive weight carry nothing, and are excluded from the
/// degree of their source.
#[derive(Debug, Clone, Copy, Default)]
pub struct Proportional;

impl Propagation for Proportional {
    const WEIGHTED: bool = true;

    #[inline(always)]
    fn unit(&self, score: f64, degree: f64) -> Option<f64> {
        (degree > 0.0).then(|| score / degree)
    }

    #[inline(always)]
    fn along(&self, unit: f64, weight: f64) -> f64 {
        if weight > 0.0 { unit * weight } else { 0.0 }
    }
}

/// Splits the score uniformly among the outgoing arcs, but offsetting the
/// degree by the average degree of the graph, as in ArticleRank.
///
/// Nodes with small degree thus transfer less than their whole score.
#[derive(Debug, Clone, Copy)]
pub struct DegreeOffset {
    pub average_degree: f64,
}

impl Propagation for DegreeOffset {
    const WEIGHTED: bool = false;

    #[inline(always)]
    fn unit(&self, score: f64, degree: f64) -> Option<f64> {
        (degree > 0.0).then(|| score / (degree + self.average_degree))
    }

    #[inline(always)]
    fn along(&self, unit: f64, _weight: f64) -> f64 {
        unit
    }
}

/// The centrality computed by [`PageRank`](super::PageRank).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// Classical PageRank with [uniform](Uniform) propagation.
    #[default]
    PageRank,
    /// PageRank with [weight-proportional](Proportional) propagation.
    Weighted,
    /// ArticleRank, with [degree-offset](DegreeOffset) propagation.
    ArticleRank,
    /// Eigenvector centrality: [uniform](Uniform) propagation with damping
    /// factor one and no base score.
    Eigenvector,
}

impl Variant {
    /// Returns whether this variant needs arc weights.
    pub fn is_weighted(&self) -> bool {
        matches!(self, Variant::Weighted)
    }
}

impl Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variant::PageRank => f.write_str("PageRank"),
            Variant::Weighted => f.write_str("weighted PageRank"),
            Variant::ArticleRank => f.write_str("ArticleRank"),
            Variant::Eigenvector => f.write_str("eigenvector centrality"),
        }
    }
}
