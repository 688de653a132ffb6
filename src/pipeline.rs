//! End-to-end sentiment workflow: load, split, train, evaluate.
//!
//! # Examples
//!
//! ```no_run
//! use std::path::Path;
//!
//! use textsense::config::TextsenseConfig;
//! use textsense::pipeline::SentimentPipeline;
//!
//! let pipeline = SentimentPipeline::new(TextsenseConfig::default())?;
//! let report = pipeline.run(Path::new("data/sentiment_labelled.txt"))?;
//! println!("accuracy: {:.4}", report.metrics.accuracy);
//!
//! let prediction = report.model().predict("This place is very good")?;
//! println!("{} -> {}", prediction.text, prediction.prediction);
//! # Ok::<(), textsense::error::TextsenseError>(())
//! ```

use std::path::Path;
use std::time::Instant;

use log::info;

use crate::config::TextsenseConfig;
use crate::data::{Record, load_from_text_file, train_test_split};
use crate::error::Result;
use crate::ml::{BinaryClassificationMetrics, SentimentModel, TrainingStats};

/// Outcome of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Number of records in the source file.
    pub total_records: usize,
    pub train_size: usize,
    pub test_size: usize,
    pub training_stats: TrainingStats,
    /// Metrics on the held-out test partition.
    pub metrics: BinaryClassificationMetrics,
    /// Wall-clock time of the whole run.
    pub elapsed_ms: u64,
    model: SentimentModel,
}

impl PipelineReport {
    /// The trained model, ready for predictions.
    pub fn model(&self) -> &SentimentModel {
        &self.model
    }

    /// Take ownership of the trained model.
    pub fn into_model(self) -> SentimentModel {
        self.model
    }
}

/// Runs the fixed workflow with one configuration.
#[derive(Debug, Clone)]
pub struct SentimentPipeline {
    config: TextsenseConfig,
}

impl SentimentPipeline {
    /// Create a pipeline after validating `config`.
    pub fn new(config: TextsenseConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The validated configuration this pipeline runs with.
    pub fn config(&self) -> &TextsenseConfig {
        &self.config
    }

    /// Load the dataset at `path` and run every stage on it.
    pub fn run(&self, path: &Path) -> Result<PipelineReport> {
        let start = Instant::now();
        info!("Loading dataset from {}", path.display());
        let records = load_from_text_file(path, &self.config.data)?;
        self.run_from(records, start)
    }

    /// Run every stage on records that are already in memory.
    pub fn run_records(&self, records: Vec<Record>) -> Result<PipelineReport> {
        self.run_from(records, Instant::now())
    }

    fn run_from(&self, records: Vec<Record>, start: Instant) -> Result<PipelineReport> {
        let total_records = records.len();
        let (train, test) = train_test_split(records, &self.config.split)?.into_parts();

        info!("Training on {} records", train.len());
        let model = SentimentModel::train(&train, &self.config.model_options())?;

        info!("Evaluating on {} records", test.len());
        let metrics = model.evaluate(&test)?;

        let elapsed_ms = start.elapsed().as_millis() as u64;
        info!("Pipeline finished in {elapsed_ms}ms");

        Ok(PipelineReport {
            total_records,
            train_size: train.len(),
            test_size: test.len(),
            training_stats: model.training_stats().clone(),
            metrics,
            elapsed_ms,
            model,
        })
    }
}
