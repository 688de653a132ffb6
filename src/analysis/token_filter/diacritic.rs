//! Diacritic removal filter.
//!
//! Decomposes token text (NFD) and drops combining marks, so that "café",
//! "cafe\u{301}" and "cafe" all produce the same token.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// A filter that strips diacritics from tokens.
///
/// # Examples
///
/// ```
/// use textsense::analysis::token_filter::Filter;
/// use textsense::analysis::token_filter::diacritic::DiacriticFilter;
/// use textsense::analysis::token::Token;
///
/// let filter = DiacriticFilter::new();
/// let tokens = vec![Token::new("crème", 0), Token::new("brûlée", 1)];
/// let result: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
///     .unwrap()
///     .collect();
///
/// assert_eq!(result[0].text, "creme");
/// assert_eq!(result[1].text, "brulee");
/// ```
#[derive(Clone, Debug, Default)]
pub struct DiacriticFilter;

impl DiacriticFilter {
    /// Create a new diacritic filter.
    pub fn new() -> Self {
        DiacriticFilter
    }

    /// Strip diacritics from a single string.
    pub fn strip(text: &str) -> String {
        if text.is_ascii() {
            return text.to_string();
        }
        text.nfd().filter(|c| !is_combining_mark(*c)).collect()
    }
}

impl Filter for DiacriticFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered_tokens = tokens
            .map(|token| {
                let stripped = Self::strip(&token.text);
                token.with_text(stripped)
            })
            .collect::<Vec<_>>();

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "diacritic"
    }
}
