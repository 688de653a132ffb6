//! Token filter implementations for token transformation.
//!
//! Filters transform the token streams produced by tokenizers. They can modify
//! tokens in place (lowercasing, diacritic removal) or derive new tokens from
//! neighbouring ones (word n-grams).
//!
//! # Available Filters
//!
//! - [`lowercase::LowercaseFilter`] - Converts tokens to lowercase
//! - [`diacritic::DiacriticFilter`] - Strips combining marks ("café" -> "cafe")
//! - [`shingle::ShingleFilter`] - Emits word n-grams
//!
//! # Filter Chaining
//!
//! ```text
//! Tokenizer → Lowercase → Diacritic → Shingle → Featurizer
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform token streams.
///
/// Filters receive a stream of tokens and produce a new stream. The trait
/// requires `Send + Sync` like [`Tokenizer`](crate::analysis::tokenizer::Tokenizer).
///
/// # Examples
///
/// ```
/// use textsense::analysis::token::{Token, TokenStream};
/// use textsense::analysis::token_filter::Filter;
/// use textsense::error::Result;
///
/// struct ReverseFilter;
///
/// impl Filter for ReverseFilter {
///     fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
///         let reversed: Vec<Token> = tokens
///             .map(|mut t| {
///                 t.text = t.text.chars().rev().collect();
///                 t
///             })
///             .collect();
///         Ok(Box::new(reversed.into_iter()))
///     }
///
///     fn name(&self) -> &'static str {
///         "reverse"
///     }
/// }
/// ```
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod diacritic;
pub mod lowercase;
pub mod shingle;
