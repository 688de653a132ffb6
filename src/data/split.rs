//! Seeded train/test holdout split.

use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::data::record::Record;
use crate::error::{Result, TextsenseError};

/// Options for [`train_test_split`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitOptions {
    /// Fraction of records moved to the test partition, in `[0, 1]`.
    pub test_fraction: f64,
    /// RNG seed. `None` draws a seed from the operating system.
    pub seed: Option<u64>,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: Some(0),
        }
    }
}

/// An immutable (train, test) pair derived once from a source dataset.
///
/// The partitions are disjoint and their sizes sum to the source size. Each
/// partition keeps the relative order the records had in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitDataset {
    train: Vec<Record>,
    test: Vec<Record>,
}

impl SplitDataset {
    /// The training partition.
    pub fn train(&self) -> &[Record] {
        &self.train
    }

    /// The held-out test partition.
    pub fn test(&self) -> &[Record] {
        &self.test
    }

    /// Total number of records across both partitions.
    pub fn len(&self) -> usize {
        self.train.len() + self.test.len()
    }

    /// Whether both partitions are empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consume the split, returning `(train, test)`.
    pub fn into_parts(self) -> (Vec<Record>, Vec<Record>) {
        (self.train, self.test)
    }
}

/// Split `records` into train and test partitions.
///
/// `round(n * test_fraction)` records, chosen by a seeded shuffle, go to the
/// test partition; the rest go to training.
pub fn train_test_split(records: Vec<Record>, options: &SplitOptions) -> Result<SplitDataset> {
    let fraction = options.test_fraction;
    if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
        return Err(TextsenseError::invalid_argument(format!(
            "test_fraction must be within [0, 1], got {fraction}"
        )));
    }

    let total = records.len();
    let test_len = ((total as f64 * fraction).round() as usize).min(total);

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut indices: Vec<usize> = (0..total).collect();
    indices.shuffle(&mut rng);

    let mut in_test = vec![false; total];
    for &index in &indices[..test_len] {
        in_test[index] = true;
    }

    let mut train = Vec::with_capacity(total - test_len);
    let mut test = Vec::with_capacity(test_len);
    for (record, is_test) in records.into_iter().zip(in_test) {
        if is_test {
            test.push(record);
        } else {
            train.push(record);
        }
    }

    info!(
        "Split {} records into {} train / {} test (test_fraction={})",
        total,
        train.len(),
        test.len(),
        fraction
    );

    Ok(SplitDataset { train, test })
}
