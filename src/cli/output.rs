//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, TextsenseArgs};
use crate::error::Result;
use crate::ml::{BinaryClassificationMetrics, SentimentPrediction, TrainingStats};

/// Result structure for a full pipeline run.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunResult {
    pub data_path: String,
    pub total_records: usize,
    pub train_size: usize,
    pub test_size: usize,
    pub training: TrainingStats,
    pub metrics: BinaryClassificationMetrics,
    pub duration_ms: u64,
    pub sample_prediction: SentimentPrediction,
    pub batch_predictions: Vec<SentimentPrediction>,
}

/// Result structure for the predict command.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResults {
    pub predictions: Vec<SentimentPrediction>,
}

/// Plain-text rendering of a command result.
pub trait HumanOutput {
    fn print_human(&self, args: &TextsenseArgs);
}

/// Output a result in the specified format.
pub fn output_result<T>(message: &str, result: &T, args: &TextsenseArgs) -> Result<()>
where
    T: Serialize + HumanOutput,
{
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 0 {
                println!("{message}");
                println!();
            }
            result.print_human(args);
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &TextsenseArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Print a section banner.
pub fn banner(title: &str) {
    println!("=============== {title} ===============");
}

fn sentiment_label(prediction: bool) -> &'static str {
    if prediction { "Positive" } else { "Negative" }
}

fn print_predictions(predictions: &[SentimentPrediction]) {
    for p in predictions {
        println!(
            "Sentiment: {} | Prediction: {} | Probability: {:.4}",
            p.text,
            sentiment_label(p.prediction),
            p.probability
        );
    }
}

impl HumanOutput for RunResult {
    fn print_human(&self, args: &TextsenseArgs) {
        banner("Load and Split Data");
        println!("Source: {}", self.data_path);
        println!(
            "Records: {} (train: {}, test: {})",
            self.total_records, self.train_size, self.test_size
        );
        println!();

        banner("Train the Model");
        println!(
            "Epochs: {} | Converged: {} | Duality gap: {:.6}",
            self.training.epochs, self.training.converged, self.training.duality_gap
        );
        println!();

        banner("Evaluate the Model");
        let m = &self.metrics;
        println!("Accuracy: {:.2}%", m.accuracy * 100.0);
        println!("Auc: {:.2}%", m.auc * 100.0);
        println!("F1Score: {:.2}%", m.f1_score * 100.0);
        if args.verbosity() > 1 {
            println!("Auprc: {:.2}%", m.auprc * 100.0);
            println!(
                "Positive precision/recall: {:.4} / {:.4}",
                m.positive_precision, m.positive_recall
            );
            println!(
                "Negative precision/recall: {:.4} / {:.4}",
                m.negative_precision, m.negative_recall
            );
            println!("Log loss: {:.4} bits", m.log_loss);
            println!("Log loss reduction: {:.4}", m.log_loss_reduction);
            let cm = &m.confusion_matrix;
            println!(
                "Confusion matrix: TP={} FP={} TN={} FN={}",
                cm.true_positive, cm.false_positive, cm.true_negative, cm.false_negative
            );
        }
        println!();

        banner("Prediction Test with a Single Sample");
        print_predictions(std::slice::from_ref(&self.sample_prediction));
        println!();

        banner("Prediction Test with Multiple Samples");
        print_predictions(&self.batch_predictions);
        println!();

        println!("Elapsed: {}ms", self.duration_ms);
    }
}

impl HumanOutput for PredictionResults {
    fn print_human(&self, _args: &TextsenseArgs) {
        print_predictions(&self.predictions);
    }
}
