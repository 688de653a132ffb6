//! Command line argument parsing for the textsense CLI using clap.

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Dataset used when no `--data` is given.
pub const DEFAULT_DATA_PATH: &str = "data/sentiment_labelled.txt";

/// Textsense - train and evaluate a binary sentiment classifier
#[derive(Parser, Debug, Clone)]
#[command(name = "textsense")]
#[command(about = "Train, evaluate and query a binary text sentiment classifier")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct TextsenseArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(
        short = 'f',
        long = "format",
        default_value = "human",
        global = true
    )]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute; without one the default demo run is performed
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl TextsenseArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }

    /// Log level for the effective verbosity.
    pub fn log_level(&self) -> LevelFilter {
        match self.verbosity() {
            0 => LevelFilter::Error,
            1 => LevelFilter::Warn,
            2 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Load, split, train and evaluate, then predict the sample texts
    Run(RunArgs),

    /// Train on a dataset, then predict the given texts
    Predict(PredictArgs),
}

/// Options shared by every command that trains a model.
#[derive(Parser, Debug, Clone)]
pub struct TrainingArgs {
    /// Labeled dataset (one `label<TAB>text` record per line)
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,
}

impl Default for TrainingArgs {
    fn default() -> Self {
        Self {
            data: PathBuf::from(DEFAULT_DATA_PATH),
            config: None,
        }
    }
}

/// Arguments for a full run
#[derive(Parser, Debug, Clone, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub training: TrainingArgs,

    /// Fraction of records held out for evaluation
    #[arg(short, long, value_name = "FRACTION")]
    pub test_fraction: Option<f64>,

    /// Seed of the train/test split
    #[arg(short, long)]
    pub seed: Option<u64>,
}

/// Arguments for prediction
#[derive(Parser, Debug, Clone)]
pub struct PredictArgs {
    #[command(flatten)]
    pub training: TrainingArgs,

    /// Texts to classify
    #[arg(value_name = "TEXT", required = true)]
    pub texts: Vec<String>,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_no_subcommand() {
        let args = TextsenseArgs::try_parse_from(["textsense"]).unwrap();
        assert!(args.command.is_none());
        assert_eq!(args.output_format, OutputFormat::Human);
    }

    #[test]
    fn test_run_command() {
        let args = TextsenseArgs::try_parse_from([
            "textsense",
            "run",
            "--data",
            "reviews.tsv",
            "--test-fraction",
            "0.3",
            "--seed",
            "7",
        ])
        .unwrap();

        if let Some(Command::Run(run_args)) = args.command {
            assert_eq!(run_args.training.data, PathBuf::from("reviews.tsv"));
            assert_eq!(run_args.training.config, None);
            assert_eq!(run_args.test_fraction, Some(0.3));
            assert_eq!(run_args.seed, Some(7));
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_run_defaults() {
        let args = TextsenseArgs::try_parse_from(["textsense", "run"]).unwrap();

        if let Some(Command::Run(run_args)) = args.command {
            assert_eq!(run_args.training.data, PathBuf::from(DEFAULT_DATA_PATH));
            assert_eq!(run_args.test_fraction, None);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_predict_command() {
        let args = TextsenseArgs::try_parse_from([
            "textsense",
            "predict",
            "--config",
            "textsense.json",
            "I love this spaghetti.",
            "This was a horrible meal",
        ])
        .unwrap();

        if let Some(Command::Predict(predict_args)) = args.command {
            assert_eq!(
                predict_args.training.config,
                Some(PathBuf::from("textsense.json"))
            );
            assert_eq!(
                predict_args.texts,
                vec!["I love this spaghetti.", "This was a horrible meal"]
            );
        } else {
            panic!("Expected Predict command");
        }
    }

    #[test]
    fn test_predict_requires_text() {
        assert!(TextsenseArgs::try_parse_from(["textsense", "predict"]).is_err());
    }

    #[test]
    fn test_verbosity_levels() {
        let args = TextsenseArgs::try_parse_from(["textsense"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        let args = TextsenseArgs::try_parse_from(["textsense", "-vv", "run"]).unwrap();
        assert_eq!(args.verbosity(), 2);

        let args = TextsenseArgs::try_parse_from(["textsense", "run", "-vvv"]).unwrap();
        assert_eq!(args.verbosity(), 3);

        let args = TextsenseArgs::try_parse_from(["textsense", "--quiet", "-v"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_log_levels() {
        let level = |argv: &[&str]| TextsenseArgs::try_parse_from(argv).unwrap().log_level();

        assert_eq!(level(&["textsense", "-q"]), LevelFilter::Error);
        assert_eq!(level(&["textsense"]), LevelFilter::Warn);
        assert_eq!(level(&["textsense", "-vv"]), LevelFilter::Info);
        assert_eq!(level(&["textsense", "-vvvv", "run"]), LevelFilter::Debug);
    }

    #[test]
    fn test_output_format() {
        let args =
            TextsenseArgs::try_parse_from(["textsense", "--format", "json", "--pretty"]).unwrap();
        assert_eq!(args.output_format, OutputFormat::Json);
        assert!(args.pretty);

        assert!(TextsenseArgs::try_parse_from(["textsense", "--format", "yaml"]).is_err());
    }
}
