/*
 * SPDX-FileCopyrightText: 2026 The rankgraph developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/// An append-only [ragged array](https://en.wikipedia.org/wiki/Ragged_array).
///
/// Rows of different lengths are stored back to back in a single vector of
/// values, and a vector of offsets (one more than the number of rows, the
/// first being zero) delimits them. Compared to a vector of vectors, there is
/// a single allocation for the values, which matters when rows are many and
/// short, as it happens with per-node arc data.
///
/// # Examples
///
/// ```
/// use rankgraph::utils::RaggedArray;
///
/// let mut weights = RaggedArray::new();
/// weights.push([0.5, 1.5]);
/// weights.push([]);
/// weights.push([2.0]);
/// assert_eq!(weights.len(), 3);
/// assert_eq!(weights.num_values(), 3);
/// assert_eq!(&weights[0], &[0.5, 1.5]);
/// assert!(weights[1].is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct RaggedArray<T> {
    offsets: Vec<usize>,
    values: Vec<T>,
}

impl<T> Default for RaggedArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RaggedArray<T> {
    /// Creates a new empty ragged array.
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    /// Creates a new empty ragged array with room for the given number of
    /// rows and values.
    pub fn with_capacity(rows: usize, values: usize) -> Self {
        let mut offsets = Vec::with_capacity(rows + 1);
        offsets.push(0);
        Self {
            offsets,
            values: Vec::with_capacity(values),
        }
    }

    /// Appends a row.
    pub fn push(&mut self, row: impl IntoIterator<Item = T>) {
        self.values.extend(row);
        self.offsets.push(self.values.len());
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Returns whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the overall number of values.
    pub fn num_values(&self) -> usize {
        self.values.len()
    }

    /// Shrinks offsets and values to fit their length.
    pub fn shrink_to_fit(&mut self) {
        self.offsets.shrink_to_fit();
        self.values.shrink_to_fit();
    }

    /// Returns an iterator over the rows.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.offsets
            .windows(2)
            .map(|w| &self.values[w[0]..w[1]])
    }
}

impl<T> core::ops::Index<usize> for RaggedArray<T> {
    type Output = [T];

    fn index(&self, row: usize) -> &Self::Output {
        &self.values[self.offsets[row]..self.offsets[row + 1]]
    }
}
