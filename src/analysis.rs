//! Text analysis module for textsense.
//!
//! Tokenizers, token filters and the analyzers that chain them. The
//! featurizer runs two analyzers over every input: one for word n-grams and
//! one for character n-grams.

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
