//! Binary classification metrics.
//!
//! Compares predicted probabilities against ground-truth labels. AUC comes
//! from the Mann-Whitney rank statistic with average ranks for tied scores;
//! AUPRC is the step-wise average precision; log-loss is in bits.

use std::cmp::Ordering;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TextsenseError};

const PROBABILITY_EPSILON: f64 = 1e-15;

/// Counts of prediction outcomes at a fixed threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_positive: usize,
    pub false_positive: usize,
    pub true_negative: usize,
    pub false_negative: usize,
}

impl ConfusionMatrix {
    /// Tally predictions against labels.
    pub fn from_predictions(labels: &[bool], predictions: &[bool]) -> Self {
        let mut cm = Self::default();
        for (&label, &predicted) in labels.iter().zip(predictions) {
            match (label, predicted) {
                (true, true) => cm.true_positive += 1,
                (false, true) => cm.false_positive += 1,
                (false, false) => cm.true_negative += 1,
                (true, false) => cm.false_negative += 1,
            }
        }
        cm
    }

    /// Total number of examples.
    pub fn total(&self) -> usize {
        self.true_positive + self.false_positive + self.true_negative + self.false_negative
    }
}

/// Metrics of a calibrated binary classifier on a labeled set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryClassificationMetrics {
    /// Fraction of correct predictions.
    pub accuracy: f64,
    /// Area under the ROC curve.
    pub auc: f64,
    /// Area under the precision-recall curve (average precision).
    pub auprc: f64,
    /// Harmonic mean of positive precision and recall.
    pub f1_score: f64,
    pub positive_precision: f64,
    pub positive_recall: f64,
    pub negative_precision: f64,
    pub negative_recall: f64,
    /// Mean log-loss in bits.
    pub log_loss: f64,
    /// `1 - log_loss / entropy`; how much better than predicting the prior.
    pub log_loss_reduction: f64,
    /// Entropy of the label distribution in bits.
    pub entropy: f64,
    pub confusion_matrix: ConfusionMatrix,
}

/// Compute metrics for `probabilities` of the positive class against `labels`.
///
/// An example is predicted positive when its probability is at least
/// `threshold`.
pub fn evaluate(
    labels: &[bool],
    probabilities: &[f32],
    threshold: f32,
) -> Result<BinaryClassificationMetrics> {
    if labels.is_empty() {
        return Err(TextsenseError::evaluation("test set is empty"));
    }
    if labels.len() != probabilities.len() {
        return Err(TextsenseError::evaluation(format!(
            "{} labels but {} probabilities",
            labels.len(),
            probabilities.len()
        )));
    }
    if let Some(p) = probabilities
        .iter()
        .find(|p| !p.is_finite() || !(0.0..=1.0).contains(*p))
    {
        return Err(TextsenseError::evaluation(format!(
            "probability {p} is not within [0, 1]"
        )));
    }
    let positives = labels.iter().filter(|&&l| l).count();
    let negatives = labels.len() - positives;
    if positives == 0 || negatives == 0 {
        return Err(TextsenseError::evaluation(
            "AUC is undefined: the test set contains a single class",
        ));
    }

    let predictions: Vec<bool> = probabilities.iter().map(|&p| p >= threshold).collect();
    let cm = ConfusionMatrix::from_predictions(labels, &predictions);

    let positive_precision = ratio(cm.true_positive, cm.true_positive + cm.false_positive);
    let positive_recall = ratio(cm.true_positive, cm.true_positive + cm.false_negative);
    let negative_precision = ratio(cm.true_negative, cm.true_negative + cm.false_negative);
    let negative_recall = ratio(cm.true_negative, cm.true_negative + cm.false_positive);
    let f1_score = if positive_precision + positive_recall > 0.0 {
        2.0 * positive_precision * positive_recall / (positive_precision + positive_recall)
    } else {
        0.0
    };

    let scores: Vec<f64> = probabilities.iter().map(|&p| f64::from(p)).collect();
    let log_loss = log_loss(labels, &scores);
    let entropy = bernoulli_entropy_bits(positives as f64 / labels.len() as f64);

    let metrics = BinaryClassificationMetrics {
        accuracy: ratio(cm.true_positive + cm.true_negative, cm.total()),
        auc: roc_auc(labels, &scores, positives, negatives),
        auprc: average_precision(labels, &scores, positives),
        f1_score,
        positive_precision,
        positive_recall,
        negative_precision,
        negative_recall,
        log_loss,
        log_loss_reduction: 1.0 - log_loss / entropy,
        entropy,
        confusion_matrix: cm,
    };

    info!(
        "Evaluated {} examples: accuracy={:.4} auc={:.4} f1={:.4}",
        labels.len(),
        metrics.accuracy,
        metrics.auc,
        metrics.f1_score
    );
    Ok(metrics)
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Indices of `scores` ordered by score.
fn sorted_indices(scores: &[f64], descending: bool) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        let ord = scores[a].partial_cmp(&scores[b]).unwrap_or(Ordering::Equal);
        if descending { ord.reverse() } else { ord }
    });
    order
}

/// Length of the run of equal scores starting at `order[start]`.
fn tie_run(scores: &[f64], order: &[usize], start: usize) -> usize {
    let value = scores[order[start]];
    order[start..]
        .iter()
        .take_while(|&&i| scores[i] == value)
        .count()
}

fn roc_auc(labels: &[bool], scores: &[f64], positives: usize, negatives: usize) -> f64 {
    let order = sorted_indices(scores, false);

    let mut positive_rank_sum = 0.0;
    let mut start = 0;
    while start < order.len() {
        let run = tie_run(scores, &order, start);
        // 1-based ranks start+1 ..= start+run share their average.
        let average_rank = start as f64 + (run as f64 + 1.0) / 2.0;
        let tied_positives = order[start..start + run]
            .iter()
            .filter(|&&i| labels[i])
            .count();
        positive_rank_sum += average_rank * tied_positives as f64;
        start += run;
    }

    let p = positives as f64;
    (positive_rank_sum - p * (p + 1.0) / 2.0) / (p * negatives as f64)
}

fn average_precision(labels: &[bool], scores: &[f64], positives: usize) -> f64 {
    let order = sorted_indices(scores, true);

    let mut true_positives = 0usize;
    let mut seen = 0usize;
    let mut previous_recall = 0.0;
    let mut area = 0.0;
    let mut start = 0;
    while start < order.len() {
        let run = tie_run(scores, &order, start);
        true_positives += order[start..start + run]
            .iter()
            .filter(|&&i| labels[i])
            .count();
        seen += run;

        let recall = true_positives as f64 / positives as f64;
        let precision = true_positives as f64 / seen as f64;
        area += (recall - previous_recall) * precision;
        previous_recall = recall;
        start += run;
    }
    area
}

fn log_loss(labels: &[bool], scores: &[f64]) -> f64 {
    let total: f64 = labels
        .iter()
        .zip(scores)
        .map(|(&label, &p)| {
            let p = p.clamp(PROBABILITY_EPSILON, 1.0 - PROBABILITY_EPSILON);
            if label { -p.log2() } else { -(1.0 - p).log2() }
        })
        .sum();
    total / labels.len() as f64
}

fn bernoulli_entropy_bits(p: f64) -> f64 {
    let term = |q: f64| if q <= 0.0 { 0.0 } else { -q * q.log2() };
    term(p) + term(1.0 - p)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_perfect_ranking() {
        let labels = [false, false, true, true];
        let probabilities = [0.1, 0.4, 0.6, 0.9];
        let m = evaluate(&labels, &probabilities, 0.5).unwrap();

        assert!(close(m.accuracy, 1.0));
        assert!(close(m.auc, 1.0));
        assert!(close(m.auprc, 1.0));
        assert!(close(m.f1_score, 1.0));
        assert_eq!(m.confusion_matrix.true_positive, 2);
        assert_eq!(m.confusion_matrix.true_negative, 2);
        assert!(close(m.entropy, 1.0));
        assert!(m.log_loss_reduction > 0.0);
    }

    #[test]
    fn test_known_values() {
        // Scores ranked: 0.1(-) 0.35(+) 0.4(-) 0.8(+)
        let labels = [false, true, false, true];
        let probabilities = [0.1, 0.35, 0.4, 0.8];
        let m = evaluate(&labels, &probabilities, 0.5).unwrap();

        // 3 of 4 positive/negative pairs ordered correctly.
        assert!(close(m.auc, 0.75));
        // tp=1 fp=0 tn=2 fn=1
        assert!(close(m.accuracy, 0.75));
        assert!(close(m.positive_precision, 1.0));
        assert!(close(m.positive_recall, 0.5));
        assert!(close(m.negative_precision, 2.0 / 3.0));
        assert!(close(m.negative_recall, 1.0));
        assert!(close(m.f1_score, 2.0 / 3.0));
        // precision 1 at recall 0.5, precision 2/3 at recall 1
        assert!(close(m.auprc, 0.5 + 0.5 * 2.0 / 3.0));
    }

    #[test]
    fn test_ties_get_average_rank() {
        let labels = [true, false];
        let probabilities = [0.5, 0.5];
        let m = evaluate(&labels, &probabilities, 0.5).unwrap();
        assert!(close(m.auc, 0.5));
    }

    #[test]
    fn test_no_positive_predictions() {
        let labels = [true, false, true];
        let probabilities = [0.2, 0.1, 0.3];
        let m = evaluate(&labels, &probabilities, 0.5).unwrap();

        assert!(close(m.positive_precision, 0.0));
        assert!(close(m.f1_score, 0.0));
        assert!(close(m.auc, 1.0));
    }

    #[test]
    fn test_log_loss_in_bits() {
        let labels = [true, false];
        let probabilities = [0.5, 0.5];
        let m = evaluate(&labels, &probabilities, 0.5).unwrap();
        assert!(close(m.log_loss, 1.0));
        assert!(close(m.log_loss_reduction, 0.0));
    }

    #[test]
    fn test_metrics_in_unit_interval() {
        let labels = [true, false, true, false, true, true, false];
        let probabilities = [0.9, 0.8, 0.2, 0.3, 0.55, 0.51, 0.49];
        let m = evaluate(&labels, &probabilities, 0.5).unwrap();

        for value in [
            m.accuracy,
            m.auc,
            m.auprc,
            m.f1_score,
            m.positive_precision,
            m.positive_recall,
            m.negative_precision,
            m.negative_recall,
        ] {
            assert!((0.0..=1.0).contains(&value), "{value} out of range");
        }
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(evaluate(&[], &[], 0.5).is_err());
        assert!(evaluate(&[true, false], &[0.5], 0.5).is_err());
        assert!(evaluate(&[true, false], &[0.5, f32::NAN], 0.5).is_err());
        assert!(evaluate(&[true, false], &[0.5, 1.5], 0.5).is_err());

        let err = evaluate(&[true, true], &[0.4, 0.6], 0.5).unwrap_err();
        assert!(matches!(err, TextsenseError::Evaluation(_)));
    }
}
