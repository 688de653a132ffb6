//! The record type shared by every pipeline stage.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TextsenseError};

/// A single input: free text plus an optional sentiment label.
///
/// Labels are present for training and test data and absent for live
/// inference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// The text to classify.
    pub text: String,
    /// `true` for positive sentiment, `false` for negative.
    pub label: Option<bool>,
}

impl Record {
    /// Create a labeled record.
    pub fn labeled<S: Into<String>>(text: S, label: bool) -> Self {
        Record {
            text: text.into(),
            label: Some(label),
        }
    }

    /// Create an unlabeled record for inference.
    pub fn unlabeled<S: Into<String>>(text: S) -> Self {
        Record {
            text: text.into(),
            label: None,
        }
    }
}

/// Collect the labels of `records`, failing on the first record without one.
pub fn require_labels(records: &[Record]) -> Result<Vec<bool>> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            record
                .label
                .ok_or_else(|| TextsenseError::schema(format!("record {i} has no label")))
        })
        .collect()
}
