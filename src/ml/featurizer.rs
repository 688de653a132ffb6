//! Hashed bag-of-n-grams text featurizer.
//!
//! Every text is mapped into a sparse vector of dimension `2^hash_bits`:
//!
//! 1. lowercase and strip diacritics,
//! 2. word n-grams (`1..=word_ngram_length`) over Unicode words,
//! 3. character n-grams over the normalized text wrapped in `\u{2}`/`\u{3}`
//!    markers, so that word starts and ends get their own grams,
//! 4. each n-gram is hashed with CRC32 under a namespace prefix and counted,
//! 5. the count vector is optionally scaled to unit L2 norm.

use std::sync::Arc;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::token_filter::diacritic::DiacriticFilter;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::token_filter::shingle::ShingleFilter;
use crate::analysis::tokenizer::ngram::NgramTokenizer;
use crate::analysis::tokenizer::unicode_word::UnicodeWordTokenizer;
use crate::error::{Result, TextsenseError};
use crate::ml::sparse::SparseVector;

const TEXT_START: char = '\u{2}';
const TEXT_END: char = '\u{3}';
const WORD_NAMESPACE: &[u8] = b"w:";
const CHAR_NAMESPACE: &[u8] = b"c:";

/// Longest accepted word n-gram.
pub const MAX_WORD_NGRAM_LENGTH: usize = 8;
/// Longest accepted character n-gram.
pub const MAX_CHAR_NGRAM_LENGTH: usize = 16;
/// Largest accepted `hash_bits`; the trainer keeps a dense `f64` weight per
/// dimension, so 24 bits is 128 MiB of weights.
pub const MAX_HASH_BITS: u32 = 24;

/// Options for [`TextFeaturizer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturizerOptions {
    /// Longest word n-gram; all lengths from 1 up to this are emitted.
    pub word_ngram_length: usize,
    /// Character n-gram length.
    pub char_ngram_length: usize,
    /// Emit every character n-gram length from 1 to `char_ngram_length`.
    pub char_all_lengths: bool,
    /// The feature space has `2^hash_bits` dimensions.
    pub hash_bits: u32,
    /// Initial CRC32 state for term hashing.
    pub hash_seed: u32,
    /// Scale every vector to unit L2 norm.
    pub normalize: bool,
}

impl Default for FeaturizerOptions {
    fn default() -> Self {
        Self {
            word_ngram_length: 2,
            char_ngram_length: 3,
            char_all_lengths: false,
            hash_bits: 16,
            hash_seed: 314_489_979,
            normalize: true,
        }
    }
}

impl FeaturizerOptions {
    /// Check option ranges.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_WORD_NGRAM_LENGTH).contains(&self.word_ngram_length) {
            return Err(TextsenseError::invalid_config(format!(
                "featurizer.word_ngram_length must be within 1..={MAX_WORD_NGRAM_LENGTH}, got {}",
                self.word_ngram_length
            )));
        }
        if !(1..=MAX_CHAR_NGRAM_LENGTH).contains(&self.char_ngram_length) {
            return Err(TextsenseError::invalid_config(format!(
                "featurizer.char_ngram_length must be within 1..={MAX_CHAR_NGRAM_LENGTH}, got {}",
                self.char_ngram_length
            )));
        }
        if !(1..=MAX_HASH_BITS).contains(&self.hash_bits) {
            return Err(TextsenseError::invalid_config(format!(
                "featurizer.hash_bits must be within 1..={MAX_HASH_BITS}, got {}",
                self.hash_bits
            )));
        }
        Ok(())
    }
}

/// Maps free text into fixed-dimension sparse feature vectors.
///
/// The featurizer is stateless once built: it has no vocabulary to fit, so
/// training and inference see exactly the same mapping.
#[derive(Clone)]
pub struct TextFeaturizer {
    options: FeaturizerOptions,
    word_analyzer: PipelineAnalyzer,
    char_analyzer: PipelineAnalyzer,
    mask: u32,
}

impl TextFeaturizer {
    /// Build a featurizer from validated options.
    pub fn new(options: FeaturizerOptions) -> Result<Self> {
        options.validate()?;

        let word_analyzer = PipelineAnalyzer::new(Arc::new(UnicodeWordTokenizer::new()))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .add_filter(Arc::new(DiacriticFilter::new()))
            .add_filter(Arc::new(ShingleFilter::new(1, options.word_ngram_length)?))
            .with_name("word_ngrams");

        let min_char_gram = if options.char_all_lengths {
            1
        } else {
            options.char_ngram_length
        };
        let char_analyzer = PipelineAnalyzer::new(Arc::new(NgramTokenizer::new(
            min_char_gram,
            options.char_ngram_length,
        )?))
        .with_name("char_ngrams");

        let mask = (1u32 << options.hash_bits) - 1;

        Ok(Self {
            options,
            word_analyzer,
            char_analyzer,
            mask,
        })
    }

    /// The options this featurizer was built with.
    pub fn options(&self) -> &FeaturizerOptions {
        &self.options
    }

    /// Dimension of every produced vector.
    pub fn dimension(&self) -> usize {
        1usize << self.options.hash_bits
    }

    /// Featurize one text.
    pub fn transform(&self, text: &str) -> Result<SparseVector> {
        let mut counts: AHashMap<u32, f32> = AHashMap::new();

        for token in self.word_analyzer.analyze(text)? {
            *counts.entry(self.hash(WORD_NAMESPACE, &token.text)).or_insert(0.0) += 1.0;
        }

        let normalized = Self::normalize_text(text);
        let wrapped = format!("{TEXT_START}{normalized}{TEXT_END}");
        for token in self.char_analyzer.analyze(&wrapped)? {
            *counts.entry(self.hash(CHAR_NAMESPACE, &token.text)).or_insert(0.0) += 1.0;
        }

        let mut vector = SparseVector::from_pairs(self.dimension(), counts)?;
        if self.options.normalize {
            vector.l2_normalize();
        }
        Ok(vector)
    }

    /// Featurize many texts, preserving order.
    pub fn transform_batch<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<SparseVector>> {
        texts.iter().map(|t| self.transform(t.as_ref())).collect()
    }

    /// Lowercase, strip diacritics and collapse whitespace runs.
    fn normalize_text(text: &str) -> String {
        let folded = DiacriticFilter::strip(&LowercaseFilter::lowercase(text));
        folded.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn hash(&self, namespace: &[u8], term: &str) -> u32 {
        let mut hasher = crc32fast::Hasher::new_with_initial(self.options.hash_seed);
        hasher.update(namespace);
        hasher.update(term.as_bytes());
        hasher.finalize() & self.mask
    }
}

impl std::fmt::Debug for TextFeaturizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextFeaturizer")
            .field("options", &self.options)
            .field("word_analyzer", &self.word_analyzer)
            .field("char_analyzer", &self.char_analyzer)
            .finish()
    }
}
