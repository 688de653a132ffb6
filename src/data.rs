//! Labeled text records: loading and train/test splitting.
//!
//! - [`Record`]: one text with an optional boolean label
//! - [`loader`]: parses two-column delimited files into records
//! - [`split`]: seeded holdout split into an immutable [`SplitDataset`]

pub mod loader;
pub mod record;
pub mod split;

pub use loader::{ColumnOrder, LoaderOptions, load_from_text_file, parse_records};
pub use record::Record;
pub use split::{SplitDataset, SplitOptions, train_test_split};
