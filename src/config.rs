//! Workflow configuration.
//!
//! Every section has defaults, so a JSON file only needs the keys it
//! overrides:
//!
//! ```json
//! { "split": { "test_fraction": 0.3 }, "trainer": { "max_iterations": 50 } }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::{LoaderOptions, SplitOptions};
use crate::error::{Result, TextsenseError};
use crate::ml::{FeaturizerOptions, ModelOptions, SdcaOptions};

/// Configuration of a full load, split, train and evaluate run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextsenseConfig {
    pub data: LoaderOptions,
    pub split: SplitOptions,
    pub featurizer: FeaturizerOptions,
    pub trainer: SdcaOptions,
    /// Probability at or above which a text is labeled positive.
    pub threshold: f32,
}

impl Default for TextsenseConfig {
    fn default() -> Self {
        Self {
            data: LoaderOptions::default(),
            split: SplitOptions::default(),
            featurizer: FeaturizerOptions::default(),
            trainer: SdcaOptions::default(),
            threshold: 0.5,
        }
    }
}

impl TextsenseConfig {
    /// Load a configuration from a JSON file and validate it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).map_err(|e| TextsenseError::file_access(path, e))?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section for out-of-range values.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.split.test_fraction) {
            return Err(TextsenseError::invalid_config(format!(
                "split.test_fraction must be within [0, 1], got {}",
                self.split.test_fraction
            )));
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(TextsenseError::invalid_config(format!(
                "threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        if self.data.separator == '\n' || self.data.separator == '\r' {
            return Err(TextsenseError::invalid_config(
                "data.separator cannot be a line break",
            ));
        }
        self.featurizer.validate()?;
        self.trainer.validate()?;
        Ok(())
    }

    /// The subset of the configuration that drives training.
    pub fn model_options(&self) -> ModelOptions {
        ModelOptions {
            featurizer: self.featurizer.clone(),
            trainer: self.trainer.clone(),
            threshold: self.threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::data::ColumnOrder;

    #[test]
    fn test_default_is_valid() {
        let config = TextsenseConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.split.test_fraction, 0.2);
        assert_eq!(config.featurizer.hash_bits, 16);
        assert_eq!(config.model_options().threshold, 0.5);
    }

    #[test]
    fn test_partial_json() {
        let config: TextsenseConfig = serde_json::from_str(
            r#"{"data": {"column_order": "text_first"}, "trainer": {"max_iterations": 7}}"#,
        )
        .unwrap();

        assert_eq!(config.data.column_order, ColumnOrder::TextFirst);
        assert_eq!(config.data.separator, '\t');
        assert_eq!(config.trainer.max_iterations, 7);
        assert_eq!(config.trainer.seed, 42);
        assert_eq!(config.split, SplitOptions::default());
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"split": {{"test_fraction": 0.5, "seed": 9}}}}"#).unwrap();

        let config = TextsenseConfig::from_file(file.path()).unwrap();
        assert_eq!(config.split.test_fraction, 0.5);
        assert_eq!(config.split.seed, Some(9));
    }

    #[test]
    fn test_from_file_errors() {
        let missing = TextsenseConfig::from_file("/nonexistent/textsense.json").unwrap_err();
        assert!(matches!(missing, TextsenseError::FileAccess { .. }));

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        let malformed = TextsenseConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(malformed, TextsenseError::Json(_)));

        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"threshold": 2.0}}"#).unwrap();
        let invalid = TextsenseConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(invalid, TextsenseError::Config(_)));
    }

    #[test]
    fn test_validate_sections() {
        let mut config = TextsenseConfig::default();
        config.split.test_fraction = 1.5;
        assert!(config.validate().is_err());

        let mut config = TextsenseConfig::default();
        config.trainer.l2_regularization = 0.0;
        assert!(config.validate().is_err());

        let mut config = TextsenseConfig::default();
        config.featurizer.hash_bits = 0;
        assert!(config.validate().is_err());
    }
}
