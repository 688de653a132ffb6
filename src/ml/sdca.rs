//! Logistic regression trained with stochastic dual coordinate ascent (SDCA).
//!
//! Minimizes
//!
//! ```text
//! P(w, b) = 1/n Σ log(1 + exp(-y_i (w·x_i + b))) + λ/2 (|w|² + b²)
//! ```
//!
//! by updating one dual variable per example. The bias is treated as a
//! constant feature of value 1. Training stops once the relative duality gap
//! `(P - D) / P` falls under the tolerance or the epoch budget is spent.

use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TextsenseError};
use crate::ml::linear::{LinearBinaryModel, sigmoid};
use crate::ml::sparse::SparseVector;

/// Solver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdcaOptions {
    /// L2 regularization strength λ.
    pub l2_regularization: f64,
    /// Maximum number of passes over the training data.
    pub max_iterations: usize,
    /// Relative duality gap at which training stops.
    pub convergence_tolerance: f64,
    /// Visit examples in a new random order every epoch.
    pub shuffle: bool,
    /// Seed for the visiting order.
    pub seed: u64,
}

impl Default for SdcaOptions {
    fn default() -> Self {
        Self {
            l2_regularization: 1e-3,
            max_iterations: 100,
            convergence_tolerance: 1e-2,
            shuffle: true,
            seed: 42,
        }
    }
}

impl SdcaOptions {
    /// Check option ranges.
    pub fn validate(&self) -> Result<()> {
        if !self.l2_regularization.is_finite() || self.l2_regularization <= 0.0 {
            return Err(TextsenseError::invalid_config(format!(
                "trainer.l2_regularization must be positive, got {}",
                self.l2_regularization
            )));
        }
        if self.max_iterations == 0 {
            return Err(TextsenseError::invalid_config(
                "trainer.max_iterations must be at least 1",
            ));
        }
        if !self.convergence_tolerance.is_finite() || self.convergence_tolerance <= 0.0 {
            return Err(TextsenseError::invalid_config(format!(
                "trainer.convergence_tolerance must be positive, got {}",
                self.convergence_tolerance
            )));
        }
        Ok(())
    }
}

/// Summary of a training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingStats {
    /// Number of training examples.
    pub examples: usize,
    /// Epochs actually run.
    pub epochs: usize,
    /// Primal objective after the last epoch.
    pub primal_objective: f64,
    /// Relative duality gap after the last epoch.
    pub duality_gap: f64,
    /// Whether the gap reached the tolerance.
    pub converged: bool,
}

/// SDCA trainer for L2-regularized logistic regression.
#[derive(Debug, Clone)]
pub struct SdcaLogisticRegression {
    options: SdcaOptions,
}

impl SdcaLogisticRegression {
    /// Create a trainer from validated options.
    pub fn new(options: SdcaOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// The solver options.
    pub fn options(&self) -> &SdcaOptions {
        &self.options
    }

    /// Fit a model on `features` with boolean `labels` (`true` = positive).
    pub fn fit(
        &self,
        features: &[SparseVector],
        labels: &[bool],
    ) -> Result<(LinearBinaryModel, TrainingStats)> {
        let n = features.len();
        if n == 0 {
            return Err(TextsenseError::training("training set is empty"));
        }
        if labels.len() != n {
            return Err(TextsenseError::training(format!(
                "{} feature vectors but {} labels",
                n,
                labels.len()
            )));
        }
        let positives = labels.iter().filter(|&&l| l).count();
        if positives == 0 || positives == n {
            return Err(TextsenseError::training(
                "training set must contain both positive and negative examples",
            ));
        }
        let dimension = features[0].dimension();
        if let Some(bad) = features.iter().find(|x| x.dimension() != dimension) {
            return Err(TextsenseError::training(format!(
                "inconsistent feature dimensions: {} and {}",
                dimension,
                bad.dimension()
            )));
        }

        let lambda = self.options.l2_regularization;
        let lambda_n = lambda * n as f64;
        let targets: Vec<f64> = labels.iter().map(|&l| if l { 1.0 } else { -1.0 }).collect();
        // 1 + q/4 with q = (|x|² + 1) / (λn); the +1 is the bias feature.
        let step_divisors: Vec<f64> = features
            .iter()
            .map(|x| 1.0 + (f64::from(x.norm_squared()) + 1.0) / (4.0 * lambda_n))
            .collect();

        let mut weights = vec![0.0f64; dimension];
        let mut bias = 0.0f64;
        let mut duals = vec![0.0f64; n];
        let mut order: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(self.options.seed);

        let mut stats = TrainingStats {
            examples: n,
            epochs: 0,
            primal_objective: f64::INFINITY,
            duality_gap: f64::INFINITY,
            converged: false,
        };

        for epoch in 1..=self.options.max_iterations {
            if self.options.shuffle {
                order.shuffle(&mut rng);
            }

            for &i in &order {
                let y = targets[i];
                let x = &features[i];
                let margin = Self::margin(x, &weights, bias);

                let target = y * sigmoid(-y * margin);
                let proposed = duals[i] + (target - duals[i]) / step_divisors[i];
                // Keep α_i·y_i inside [0, 1], the domain of the dual loss.
                let clipped = (proposed * y).clamp(0.0, 1.0) * y;
                let delta = clipped - duals[i];
                if delta == 0.0 {
                    continue;
                }

                duals[i] = clipped;
                let scale = delta / lambda_n;
                for (index, value) in x.iter() {
                    weights[index] += scale * f64::from(value);
                }
                bias += scale;
            }

            let (primal, dual) = self.objectives(features, &targets, &duals, &weights, bias);
            if !primal.is_finite() || !dual.is_finite() {
                return Err(TextsenseError::training(format!(
                    "objective diverged at epoch {epoch} (primal={primal}, dual={dual})"
                )));
            }
            let gap = (primal - dual).max(0.0) / primal.max(f64::EPSILON);

            debug!("SDCA epoch {epoch}: primal={primal:.6} dual={dual:.6} gap={gap:.6}");

            stats.epochs = epoch;
            stats.primal_objective = primal;
            stats.duality_gap = gap;
            if gap <= self.options.convergence_tolerance {
                stats.converged = true;
                break;
            }
        }

        if stats.converged {
            info!(
                "SDCA converged after {} epoch(s) on {} examples (gap={:.6})",
                stats.epochs, n, stats.duality_gap
            );
        } else {
            warn!(
                "SDCA stopped after {} epoch(s) without reaching tolerance {} (gap={:.6})",
                stats.epochs, self.options.convergence_tolerance, stats.duality_gap
            );
        }

        if weights.iter().any(|w| !w.is_finite()) || !bias.is_finite() {
            return Err(TextsenseError::training("weights are not finite"));
        }
        let model = LinearBinaryModel::new(
            weights.into_iter().map(|w| w as f32).collect(),
            bias as f32,
        );
        Ok((model, stats))
    }

    fn margin(x: &SparseVector, weights: &[f64], bias: f64) -> f64 {
        x.iter()
            .map(|(index, value)| weights[index] * f64::from(value))
            .sum::<f64>()
            + bias
    }

    /// Primal and dual objective values for the current iterate.
    fn objectives(
        &self,
        features: &[SparseVector],
        targets: &[f64],
        duals: &[f64],
        weights: &[f64],
        bias: f64,
    ) -> (f64, f64) {
        let n = features.len() as f64;
        let regularizer = 0.5
            * self.options.l2_regularization
            * (weights.iter().map(|w| w * w).sum::<f64>() + bias * bias);

        let loss: f64 = features
            .iter()
            .zip(targets)
            .map(|(x, &y)| softplus(-y * Self::margin(x, weights, bias)))
            .sum::<f64>()
            / n;

        let entropy: f64 = duals
            .iter()
            .zip(targets)
            .map(|(&alpha, &y)| binary_entropy(alpha * y))
            .sum::<f64>()
            / n;

        (loss + regularizer, entropy - regularizer)
    }
}

/// `ln(1 + e^x)` without overflow.
fn softplus(x: f64) -> f64 {
    if x > 0.0 {
        x + (-x).exp().ln_1p()
    } else {
        x.exp().ln_1p()
    }
}

/// Natural-log entropy of a Bernoulli(p), with `0 ln 0 = 0`.
fn binary_entropy(p: f64) -> f64 {
    let term = |q: f64| if q <= 0.0 { 0.0 } else { -q * q.ln() };
    term(p) + term(1.0 - p)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_hot(dimension: usize, index: u32) -> SparseVector {
        SparseVector::from_pairs(dimension, vec![(index, 1.0)]).unwrap()
    }

    /// Feature 0 marks positives, feature 1 marks negatives, feature 2 is noise.
    fn toy_problem() -> (Vec<SparseVector>, Vec<bool>) {
        let mut features = Vec::new();
        let mut labels = Vec::new();
        for i in 0..40 {
            let positive = i % 2 == 0;
            let signal = if positive { 0 } else { 1 };
            let pairs = if i % 3 == 0 {
                vec![(signal, 1.0), (2, 1.0)]
            } else {
                vec![(signal, 1.0)]
            };
            features.push(SparseVector::from_pairs(3, pairs).unwrap());
            labels.push(positive);
        }
        (features, labels)
    }

    #[test]
    fn test_learns_separable_problem() {
        let (features, labels) = toy_problem();
        let trainer = SdcaLogisticRegression::new(SdcaOptions::default()).unwrap();
        let (model, stats) = trainer.fit(&features, &labels).unwrap();

        assert!(stats.epochs >= 1);
        assert!(stats.primal_objective.is_finite());
        assert!(model.weights()[0] > 0.0);
        assert!(model.weights()[1] < 0.0);

        for (x, &label) in features.iter().zip(&labels) {
            let p = LinearBinaryModel::probability(model.score(x).unwrap());
            assert_eq!(p >= 0.5, label);
        }
    }

    #[test]
    fn test_duality_gap_converges() {
        let (features, labels) = toy_problem();
        let options = SdcaOptions {
            max_iterations: 500,
            convergence_tolerance: 1e-3,
            ..SdcaOptions::default()
        };
        let (_, stats) = SdcaLogisticRegression::new(options)
            .unwrap()
            .fit(&features, &labels)
            .unwrap();

        assert!(stats.converged);
        assert!(stats.duality_gap <= 1e-3);
    }

    #[test]
    fn test_single_epoch_updates() {
        // Two orthogonal examples visited in order: the first update moves
        // only w[0] and the bias, the second sees the bias from the first.
        let features = vec![one_hot(2, 0), one_hot(2, 1)];
        let labels = [true, false];
        let options = SdcaOptions {
            max_iterations: 1,
            shuffle: false,
            ..SdcaOptions::default()
        };
        let (model, stats) = SdcaLogisticRegression::new(options)
            .unwrap()
            .fit(&features, &labels)
            .unwrap();

        let lambda_n = 1e-3 * 2.0;
        let divisor = 1.0 + (1.0 + 1.0) / (4.0 * lambda_n);
        let first = 0.5 / divisor / lambda_n;
        let second = -sigmoid(first) / divisor / lambda_n;

        let close = |a: f32, b: f64| (f64::from(a) - b).abs() < 1e-5;
        assert_eq!(stats.epochs, 1);
        assert!(close(model.weights()[0], first));
        assert!(close(model.weights()[1], second));
        assert!(close(model.bias(), first + second));
    }

    #[test]
    fn test_epoch_budget_without_convergence() {
        let (features, labels) = toy_problem();
        let options = SdcaOptions {
            max_iterations: 1,
            convergence_tolerance: 1e-12,
            ..SdcaOptions::default()
        };
        let (model, stats) = SdcaLogisticRegression::new(options)
            .unwrap()
            .fit(&features, &labels)
            .unwrap();

        assert!(!stats.converged);
        assert_eq!(stats.epochs, 1);
        assert!(stats.duality_gap > 1e-12);
        assert!(stats.duality_gap.is_finite());
        assert_eq!(model.dimension(), 3);
    }

    #[test]
    fn test_same_seed_same_model() {
        let (features, labels) = toy_problem();
        let trainer = SdcaLogisticRegression::new(SdcaOptions::default()).unwrap();
        let (a, _) = trainer.fit(&features, &labels).unwrap();
        let (b, _) = trainer.fit(&features, &labels).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_stronger_regularization_shrinks_weights() {
        let (features, labels) = toy_problem();
        let fit = |lambda: f64| {
            let options = SdcaOptions {
                l2_regularization: lambda,
                max_iterations: 300,
                convergence_tolerance: 1e-4,
                ..SdcaOptions::default()
            };
            let (model, _) = SdcaLogisticRegression::new(options)
                .unwrap()
                .fit(&features, &labels)
                .unwrap();
            model.weights()[0]
        };

        assert!(fit(1.0) < fit(0.01));
    }

    #[test]
    fn test_rejects_degenerate_inputs() {
        let trainer = SdcaLogisticRegression::new(SdcaOptions::default()).unwrap();

        assert!(trainer.fit(&[], &[]).is_err());

        let features = vec![one_hot(2, 0), one_hot(2, 1)];
        assert!(trainer.fit(&features, &[true]).is_err());
        assert!(trainer.fit(&features, &[true, true]).is_err());

        let mixed = vec![one_hot(2, 0), one_hot(3, 1)];
        let err = trainer.fit(&mixed, &[true, false]).unwrap_err();
        assert!(matches!(err, TextsenseError::Training(_)));
    }

    #[test]
    fn test_invalid_options() {
        let bad = [
            SdcaOptions {
                l2_regularization: 0.0,
                ..SdcaOptions::default()
            },
            SdcaOptions {
                max_iterations: 0,
                ..SdcaOptions::default()
            },
            SdcaOptions {
                convergence_tolerance: f64::NAN,
                ..SdcaOptions::default()
            },
        ];
        for options in bad {
            assert!(SdcaLogisticRegression::new(options).is_err());
        }
    }

    #[test]
    fn test_loss_helpers() {
        assert!((softplus(0.0) - 2f64.ln()).abs() < 1e-12);
        assert!((softplus(1000.0) - 1000.0).abs() < 1e-9);
        assert!(softplus(-1000.0) >= 0.0);

        assert_eq!(binary_entropy(0.0), 0.0);
        assert_eq!(binary_entropy(1.0), 0.0);
        assert!((binary_entropy(0.5) - 2f64.ln()).abs() < 1e-12);
    }
}
