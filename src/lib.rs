//! # Textsense
//!
//! Binary sentiment classification of short texts.
//!
//! ## Features
//!
//! - Delimited text loading with seeded train/test splitting
//! - Hashed word and character n-gram features built on a token analysis pipeline
//! - L2-regularized logistic regression trained with dual coordinate ascent
//! - Accuracy, AUC, F1 and log-loss evaluation
//! - Single and batch prediction with calibrated probabilities

pub mod analysis;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod ml;
pub mod pipeline;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
