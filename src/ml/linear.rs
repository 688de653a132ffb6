//! Fitted linear binary classifier.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TextsenseError};
use crate::ml::sparse::SparseVector;

/// Logistic function.
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Dense weights plus bias; `score = w·x + b`, `probability = sigmoid(score)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearBinaryModel {
    weights: Vec<f32>,
    bias: f32,
}

impl LinearBinaryModel {
    /// Create a model from weights and bias.
    pub fn new(weights: Vec<f32>, bias: f32) -> Self {
        Self { weights, bias }
    }

    /// The weight vector.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// The bias term.
    pub fn bias(&self) -> f32 {
        self.bias
    }

    /// Number of input features.
    pub fn dimension(&self) -> usize {
        self.weights.len()
    }

    /// Raw margin for a feature vector.
    pub fn score(&self, features: &SparseVector) -> Result<f32> {
        if features.dimension() != self.weights.len() {
            return Err(TextsenseError::invalid_argument(format!(
                "feature dimension {} does not match model dimension {}",
                features.dimension(),
                self.weights.len()
            )));
        }
        Ok(features.dot(&self.weights) + self.bias)
    }

    /// Calibrated probability of the positive class for a raw margin.
    pub fn probability(score: f32) -> f32 {
        sigmoid(f64::from(score)) as f32
    }
}
