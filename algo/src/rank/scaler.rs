/*
 * SPDX-FileCopyrightText: 2026 The rankgraph developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use kahan::KahanSum;
use std::fmt::Display;

/// Post-processing of final scores.
///
/// Scalers dividing by a norm leave the scores unchanged if the norm is
/// zero; [`MinMax`](Scaler::MinMax) sets all scores to zero if they are all
/// equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scaler {
    /// Scores are left unchanged.
    #[default]
    None,
    /// Scores are divided by their maximum absolute value.
    Max,
    /// Scores are divided by their 𝓁₁ norm.
    L1Norm,
    /// Scores are divided by their 𝓁₂ norm.
    L2Norm,
    /// Scores are mapped linearly to [0 . . 1].
    MinMax,
}

impl Scaler {
    /// Scales scores in place.
    pub fn scale(&self, scores: &mut [f64]) {
        let norm = match self {
            Scaler::None => return,
            Scaler::Max => scores.iter().fold(0.0, |max: f64, &x| max.max(x.abs())),
            Scaler::L1Norm => scores
                .iter()
                .fold(KahanSum::<f64>::new(), |sum, &x| sum + x.abs())
                .sum(),
            Scaler::L2Norm => scores
                .iter()
                .fold(KahanSum::<f64>::new(), |sum, &x| sum + x * x)
                .sum()
                .sqrt(),
            Scaler::MinMax => {
                let (min, max) = scores
                    .iter()
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &x| {
                        (min.min(x), max.max(x))
                    });
                let range = max - min;
                for x in scores.iter_mut() {
                    *x = if range > 0.0 { (*x - min) / range } else { 0.0 };
                }
                return;
            }
        };
        if norm > 0.0 {
            for x in scores.iter_mut() {
                *x /= norm;
            }
        }
    }
}

impl Display for Scaler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scaler::None => f.write_str("none"),
            Scaler::Max => f.write_str("max"),
            Scaler::L1Norm => f.write_str("l1"),
            Scaler::L2Norm => f.write_str("l2"),
            Scaler::MinMax => f.write_str("min-max"),
        }
    }
}
