//! The trained sentiment model: featurizer plus linear scorer.
//!
//! A [`SentimentModel`] is produced once by [`SentimentModel::train`] and is
//! immutable afterwards. Single-item and batch prediction go through the
//! same featurize-then-score path, so they agree exactly.

use log::info;
use serde::{Deserialize, Serialize};

use crate::data::record::{Record, require_labels};
use crate::error::{Result, TextsenseError};
use crate::ml::evaluation::{self, BinaryClassificationMetrics};
use crate::ml::featurizer::{FeaturizerOptions, TextFeaturizer};
use crate::ml::linear::LinearBinaryModel;
use crate::ml::sdca::{SdcaLogisticRegression, SdcaOptions, TrainingStats};

/// Everything needed to train a [`SentimentModel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelOptions {
    pub featurizer: FeaturizerOptions,
    pub trainer: SdcaOptions,
    /// Probability at or above which a text is labeled positive.
    pub threshold: f32,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            featurizer: FeaturizerOptions::default(),
            trainer: SdcaOptions::default(),
            threshold: 0.5,
        }
    }
}

/// A prediction for one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentPrediction {
    /// The input text, echoed back.
    pub text: String,
    /// `true` for positive sentiment.
    pub prediction: bool,
    /// Calibrated probability of positive sentiment, in `[0, 1]`.
    pub probability: f32,
    /// Raw linear margin.
    pub score: f32,
}

/// A trained binary sentiment classifier.
#[derive(Debug, Clone)]
pub struct SentimentModel {
    featurizer: TextFeaturizer,
    linear: LinearBinaryModel,
    threshold: f32,
    stats: TrainingStats,
}

impl SentimentModel {
    /// Featurize the labeled `records` and fit a logistic regression on them.
    pub fn train(records: &[Record], options: &ModelOptions) -> Result<Self> {
        if !(0.0..=1.0).contains(&options.threshold) {
            return Err(TextsenseError::invalid_config(format!(
                "threshold must be within [0, 1], got {}",
                options.threshold
            )));
        }
        let labels = require_labels(records)?;
        let featurizer = TextFeaturizer::new(options.featurizer.clone())?;
        let trainer = SdcaLogisticRegression::new(options.trainer.clone())?;

        let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
        let features = featurizer.transform_batch(&texts)?;
        let (linear, stats) = trainer.fit(&features, &labels)?;

        info!(
            "Trained sentiment model on {} records ({} features, bias={:.4})",
            records.len(),
            featurizer.dimension(),
            linear.bias()
        );

        Ok(Self {
            featurizer,
            linear,
            threshold: options.threshold,
            stats,
        })
    }

    /// Predict the sentiment of one text.
    pub fn predict(&self, text: &str) -> Result<SentimentPrediction> {
        let features = self.featurizer.transform(text)?;
        let score = self.linear.score(&features)?;
        let probability = LinearBinaryModel::probability(score);

        Ok(SentimentPrediction {
            text: text.to_string(),
            prediction: probability >= self.threshold,
            probability,
            score,
        })
    }

    /// Predict many texts; the output order matches the input order.
    pub fn predict_batch<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<SentimentPrediction>> {
        texts.iter().map(|t| self.predict(t.as_ref())).collect()
    }

    /// Predict the texts of `records`, ignoring their labels.
    pub fn predict_records(&self, records: &[Record]) -> Result<Vec<SentimentPrediction>> {
        records.iter().map(|r| self.predict(&r.text)).collect()
    }

    /// Score the labeled `records` and compute metrics against their labels.
    pub fn evaluate(&self, records: &[Record]) -> Result<BinaryClassificationMetrics> {
        let labels = require_labels(records)?;
        let probabilities: Vec<f32> = self
            .predict_records(records)?
            .into_iter()
            .map(|p| p.probability)
            .collect();
        evaluation::evaluate(&labels, &probabilities, self.threshold)
    }

    /// The featurizer the model was trained with.
    pub fn featurizer(&self) -> &TextFeaturizer {
        &self.featurizer
    }

    /// The fitted linear scorer.
    pub fn linear(&self) -> &LinearBinaryModel {
        &self.linear
    }

    /// Decision threshold on the probability.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Statistics from the training run.
    pub fn training_stats(&self) -> &TrainingStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reviews() -> Vec<Record> {
        let positive = [
            "Loved this place",
            "The food was great",
            "Great service and amazing food",
            "I love the pasta here",
            "Amazing atmosphere, loved it",
            "Really good and friendly staff",
        ];
        let negative = [
            "The food was terrible",
            "Horrible service, never again",
            "I hated the pasta",
            "Terrible atmosphere and rude staff",
            "Really bad experience",
            "The meal was horrible",
        ];
        positive
            .iter()
            .map(|t| Record::labeled(*t, true))
            .chain(negative.iter().map(|t| Record::labeled(*t, false)))
            .collect()
    }

    fn model() -> SentimentModel {
        SentimentModel::train(&reviews(), &ModelOptions::default()).unwrap()
    }

    #[test]
    fn test_fits_training_data() {
        let model = model();
        let metrics = model.evaluate(&reviews()).unwrap();

        assert!(metrics.accuracy >= 0.9, "accuracy {}", metrics.accuracy);
        assert!(model.training_stats().epochs >= 1);
        assert_eq!(model.linear().dimension(), model.featurizer().dimension());
    }

    #[test]
    fn test_prediction_fields() {
        let prediction = model().predict("This place is very good").unwrap();

        assert_eq!(prediction.text, "This place is very good");
        assert!((0.0..=1.0).contains(&prediction.probability));
        assert_eq!(prediction.prediction, prediction.probability >= 0.5);
    }

    #[test]
    fn test_single_and_batch_agree() {
        let model = model();
        let texts = ["This was a horrible meal", "I love this spaghetti."];
        let batch = model.predict_batch(&texts).unwrap();

        assert_eq!(batch.len(), 2);
        for (text, prediction) in texts.iter().zip(&batch) {
            assert_eq!(&model.predict(text).unwrap(), prediction);
            assert_eq!(&prediction.text, text);
        }
    }

    #[test]
    fn test_empty_batch() {
        let empty: [&str; 0] = [];
        assert!(model().predict_batch(&empty).unwrap().is_empty());
    }

    #[test]
    fn test_threshold_moves_decisions() {
        let options = ModelOptions {
            threshold: 1.0,
            ..ModelOptions::default()
        };
        let model = SentimentModel::train(&reviews(), &options).unwrap();
        let prediction = model.predict("Loved this place").unwrap();
        assert!(!prediction.prediction || prediction.probability >= 1.0);
    }

    #[test]
    fn test_unlabeled_training_data() {
        let mut records = reviews();
        records.push(Record::unlabeled("no label here"));

        let err = SentimentModel::train(&records, &ModelOptions::default()).unwrap_err();
        assert!(matches!(err, TextsenseError::Schema(_)));
    }

    #[test]
    fn test_invalid_threshold() {
        let options = ModelOptions {
            threshold: 1.5,
            ..ModelOptions::default()
        };
        assert!(SentimentModel::train(&reviews(), &options).is_err());
    }
}
