//! Command implementations for the textsense CLI.

use log::info;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::TextsenseConfig;
use crate::error::Result;
use crate::pipeline::SentimentPipeline;

/// Text predicted after every run.
pub const SAMPLE_TEXT: &str = "This place is very good";

/// Texts predicted as a batch after every run.
pub const SAMPLE_BATCH: [&str; 2] = ["This was a horrible meal", "I love this spaghetti."];

/// Execute a CLI command.
pub fn execute_command(args: TextsenseArgs) -> Result<()> {
    match &args.command {
        None => run_pipeline(RunArgs::default(), &args),
        Some(Command::Run(run_args)) => run_pipeline(run_args.clone(), &args),
        Some(Command::Predict(predict_args)) => predict_texts(predict_args.clone(), &args),
    }
}

/// Build the effective configuration: file values first, then flags.
pub fn load_config(training: &TrainingArgs) -> Result<TextsenseConfig> {
    match &training.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            TextsenseConfig::from_file(path)
        }
        None => Ok(TextsenseConfig::default()),
    }
}

/// Run the full workflow and predict the sample texts.
fn run_pipeline(args: RunArgs, cli_args: &TextsenseArgs) -> Result<()> {
    let mut config = load_config(&args.training)?;
    if let Some(test_fraction) = args.test_fraction {
        config.split.test_fraction = test_fraction;
    }
    if let Some(seed) = args.seed {
        config.split.seed = Some(seed);
    }

    let pipeline = SentimentPipeline::new(config)?;
    let report = pipeline.run(&args.training.data)?;

    let model = report.model();
    let sample_prediction = model.predict(SAMPLE_TEXT)?;
    let batch_predictions = model.predict_batch(&SAMPLE_BATCH)?;

    output_result(
        "Sentiment pipeline completed",
        &RunResult {
            data_path: args.training.data.to_string_lossy().to_string(),
            total_records: report.total_records,
            train_size: report.train_size,
            test_size: report.test_size,
            training: report.training_stats.clone(),
            metrics: report.metrics.clone(),
            duration_ms: report.elapsed_ms,
            sample_prediction,
            batch_predictions,
        },
        cli_args,
    )
}

/// Train on the dataset, then predict the texts given on the command line.
fn predict_texts(args: PredictArgs, cli_args: &TextsenseArgs) -> Result<()> {
    let config = load_config(&args.training)?;
    let pipeline = SentimentPipeline::new(config)?;
    let report = pipeline.run(&args.training.data)?;

    let predictions = report.model().predict_batch(&args.texts)?;

    output_result(
        &format!("Predicted {} texts", predictions.len()),
        &PredictionResults { predictions },
        cli_args,
    )
}
