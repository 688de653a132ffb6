//! Sparse feature vectors.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TextsenseError};

/// A sparse vector of fixed dimension.
///
/// Indices are strictly increasing and values are non-zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    dimension: usize,
    indices: Vec<u32>,
    values: Vec<f32>,
}

impl SparseVector {
    /// An all-zero vector.
    pub fn zeros(dimension: usize) -> Self {
        Self {
            dimension,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Build a vector from `(index, value)` pairs in any order.
    ///
    /// Values at the same index are summed and resulting zeros are dropped.
    pub fn from_pairs<I>(dimension: usize, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u32, f32)>,
    {
        let mut pairs: Vec<(u32, f32)> = pairs.into_iter().collect();
        if let Some(&(index, _)) = pairs.iter().find(|(i, _)| *i as usize >= dimension) {
            return Err(TextsenseError::invalid_argument(format!(
                "index {index} out of bounds for dimension {dimension}"
            )));
        }
        pairs.sort_unstable_by_key(|&(i, _)| i);

        let mut indices: Vec<u32> = Vec::with_capacity(pairs.len());
        let mut values: Vec<f32> = Vec::with_capacity(pairs.len());
        for (index, value) in pairs {
            match indices.last() {
                Some(&last) if last == index => {
                    if let Some(v) = values.last_mut() {
                        *v += value;
                    }
                }
                _ => {
                    indices.push(index);
                    values.push(value);
                }
            }
        }

        let (indices, values) = indices
            .into_iter()
            .zip(values)
            .filter(|&(_, v)| v != 0.0)
            .unzip();

        Ok(Self {
            dimension,
            indices,
            values,
        })
    }

    /// The vector's dimension.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Whether every entry is zero.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate over `(index, value)` pairs in increasing index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.indices
            .iter()
            .zip(&self.values)
            .map(|(&i, &v)| (i as usize, v))
    }

    /// Value at `index` (zero if not stored).
    pub fn get(&self, index: usize) -> f32 {
        match self.indices.binary_search(&(index as u32)) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    /// Squared Euclidean norm.
    pub fn norm_squared(&self) -> f32 {
        self.values.iter().map(|v| v * v).sum()
    }

    /// Scale the vector to unit Euclidean norm. Zero vectors are left as is.
    pub fn l2_normalize(&mut self) {
        let norm = self.norm_squared().sqrt();
        if norm > 0.0 {
            for value in &mut self.values {
                *value /= norm;
            }
        }
    }

    /// Dot product with a dense vector of the same dimension.
    pub fn dot(&self, dense: &[f32]) -> f32 {
        self.iter().map(|(i, v)| v * dense[i]).sum()
    }
}
