//! Character n-gram tokenizer implementation.

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::tokenizer::Tokenizer;
use crate::error::{Result, TextsenseError};

/// A tokenizer that generates character n-grams.
///
/// Character n-grams capture sub-word cues (misspellings, elongated words like
/// "sooo", shared stems) that word tokens miss.
///
/// # Examples
///
/// ```
/// use textsense::analysis::tokenizer::ngram::NgramTokenizer;
/// use textsense::analysis::tokenizer::Tokenizer;
///
/// let tokenizer = NgramTokenizer::new(3, 3).unwrap();
/// let tokens: Vec<_> = tokenizer.tokenize("good").unwrap()
///     .map(|t| t.text)
///     .collect();
/// assert_eq!(tokens, vec!["goo", "ood"]);
///
/// // Variable length (2-3)
/// let tokenizer = NgramTokenizer::new(2, 3).unwrap();
/// let tokens: Vec<_> = tokenizer.tokenize("abc").unwrap()
///     .map(|t| t.text)
///     .collect();
/// assert_eq!(tokens, vec!["ab", "abc", "bc"]);
/// ```
#[derive(Clone, Debug)]
pub struct NgramTokenizer {
    /// Minimum n-gram size
    min_gram: usize,
    /// Maximum n-gram size
    max_gram: usize,
}

impl NgramTokenizer {
    /// Create a new n-gram tokenizer.
    ///
    /// # Errors
    ///
    /// Returns an error if `min_gram` is 0 or `max_gram` is less than `min_gram`.
    pub fn new(min_gram: usize, max_gram: usize) -> Result<Self> {
        if min_gram == 0 {
            return Err(TextsenseError::analysis("min_gram must be at least 1"));
        }
        if max_gram < min_gram {
            return Err(TextsenseError::analysis(format!(
                "max_gram ({max_gram}) must be >= min_gram ({min_gram})"
            )));
        }
        Ok(Self { min_gram, max_gram })
    }

    /// Create a trigram tokenizer (n=3).
    pub fn trigram() -> Self {
        Self {
            min_gram: 3,
            max_gram: 3,
        }
    }
}

impl Tokenizer for NgramTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        // Byte offset of every char boundary, including the end of the text.
        let boundaries: Vec<usize> = text
            .char_indices()
            .map(|(offset, _)| offset)
            .chain(std::iter::once(text.len()))
            .collect();
        let char_count = boundaries.len() - 1;

        let mut tokens = Vec::new();
        for start in 0..char_count {
            for gram_size in self.min_gram..=self.max_gram {
                let end = start + gram_size;
                if end > char_count {
                    break;
                }

                let (start_offset, end_offset) = (boundaries[start], boundaries[end]);
                let position = tokens.len();
                tokens.push(Token::with_offsets(
                    &text[start_offset..end_offset],
                    position,
                    start_offset,
                    end_offset,
                ));
            }
        }

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "ngram"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ngram_creation() {
        assert!(NgramTokenizer::new(2, 3).is_ok());
        assert!(NgramTokenizer::new(0, 2).is_err());
        assert!(NgramTokenizer::new(3, 2).is_err());
    }

    #[test]
    fn test_trigram() {
        let tokenizer = NgramTokenizer::trigram();
        let tokens: Vec<Token> = tokenizer.tokenize("hello").unwrap().collect();

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].text, "hel");
        assert_eq!(tokens[1].text, "ell");
        assert_eq!(tokens[2].text, "llo");
        assert_eq!(tokens[2].position, 2);
    }

    #[test]
    fn test_multibyte_offsets() {
        let tokenizer = NgramTokenizer::new(2, 2).unwrap();
        let tokens: Vec<Token> = tokenizer.tokenize("café").unwrap().collect();

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2].text, "fé");
        // "é" takes two bytes
        assert_eq!(tokens[2].start_offset, 2);
        assert_eq!(tokens[2].end_offset, 5);
    }

    #[test]
    fn test_short_text() {
        let tokenizer = NgramTokenizer::new(3, 5).unwrap();
        assert_eq!(tokenizer.tokenize("ab").unwrap().count(), 0);
        assert_eq!(tokenizer.tokenize("").unwrap().count(), 0);
    }

    #[test]
    fn test_exact_length() {
        let tokenizer = NgramTokenizer::new(3, 3).unwrap();
        let tokens: Vec<Token> = tokenizer.tokenize("abc").unwrap().collect();

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "abc");
    }

    #[test]
    fn test_tokenizer_name() {
        assert_eq!(NgramTokenizer::trigram().name(), "ngram");
    }
}
