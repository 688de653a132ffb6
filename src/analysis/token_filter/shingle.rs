//! Shingle (word n-gram) filter implementation.
//!
//! Combines consecutive tokens into n-grams joined by a single space. With
//! `min_size = 1` the original tokens are kept alongside the n-grams, which is
//! how bag-of-words features pick up short phrases such as "not good".

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::{Result, TextsenseError};

/// A filter that emits word n-grams over the incoming tokens.
///
/// For every start token, n-grams are emitted in increasing size order, so
/// output order is deterministic for a given input.
///
/// # Examples
///
/// ```
/// use textsense::analysis::token_filter::Filter;
/// use textsense::analysis::token_filter::shingle::ShingleFilter;
/// use textsense::analysis::token::Token;
///
/// let filter = ShingleFilter::new(1, 2).unwrap();
/// let tokens = vec![Token::new("not", 0), Token::new("good", 1)];
/// let result: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
///     .unwrap()
///     .map(|t| t.text)
///     .collect();
///
/// assert_eq!(result, vec!["not", "not good", "good"]);
/// ```
#[derive(Clone, Debug)]
pub struct ShingleFilter {
    min_size: usize,
    max_size: usize,
    separator: String,
}

impl ShingleFilter {
    /// Create a new shingle filter emitting n-grams of `min_size..=max_size` tokens.
    pub fn new(min_size: usize, max_size: usize) -> Result<Self> {
        if min_size == 0 {
            return Err(TextsenseError::analysis("min_size must be at least 1"));
        }
        if max_size < min_size {
            return Err(TextsenseError::analysis(format!(
                "max_size ({max_size}) must be >= min_size ({min_size})"
            )));
        }
        Ok(Self {
            min_size,
            max_size,
            separator: " ".to_string(),
        })
    }

    /// Set the string placed between joined tokens.
    pub fn with_separator<S: Into<String>>(mut self, separator: S) -> Self {
        self.separator = separator.into();
        self
    }
}

impl Filter for ShingleFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let input: Vec<Token> = tokens.collect();
        let mut output = Vec::new();

        for start in 0..input.len() {
            let longest = self.max_size.min(input.len() - start);
            for size in self.min_size..=longest {
                let window = &input[start..start + size];
                let text = window
                    .iter()
                    .map(|t| t.text.as_str())
                    .collect::<Vec<_>>()
                    .join(&self.separator);
                let position = output.len();
                output.push(Token::with_offsets(
                    text,
                    position,
                    window[0].start_offset,
                    window[size - 1].end_offset,
                ));
            }
        }

        Ok(Box::new(output.into_iter()))
    }

    fn name(&self) -> &'static str {
        "shingle"
    }
}
