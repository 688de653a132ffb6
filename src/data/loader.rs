//! Loader for two-column delimited sentiment files.
//!
//! Each non-blank line holds a label and a text separated by a tab (by
//! default). There is no header unless [`LoaderOptions::has_header`] is set.
//!
//! ```text
//! 1	Loved this place.
//! 0	Crust is not good.
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::data::record::Record;
use crate::error::{Result, TextsenseError};

/// Which column holds the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnOrder {
    /// `label<TAB>text`; the line is split at the first separator.
    #[default]
    LabelFirst,
    /// `text<TAB>label`; the line is split at the last separator.
    TextFirst,
}

/// Options controlling how records are parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderOptions {
    /// Column layout of each line.
    pub column_order: ColumnOrder,
    /// Column separator.
    pub separator: char,
    /// Skip the first line.
    pub has_header: bool,
    /// Trim surrounding whitespace from the text column.
    pub trim_text: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            column_order: ColumnOrder::LabelFirst,
            separator: '\t',
            has_header: false,
            trim_text: true,
        }
    }
}

/// Load labeled records from a delimited text file.
///
/// Fails with [`TextsenseError::FileAccess`] if the file cannot be opened and
/// with [`TextsenseError::Format`] if a line does not match the layout.
pub fn load_from_text_file<P: AsRef<Path>>(path: P, options: &LoaderOptions) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| TextsenseError::file_access(path, e))?;
    let records = parse_records(BufReader::new(file), options)?;

    info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Parse labeled records from any buffered reader.
pub fn parse_records<R: BufRead>(reader: R, options: &LoaderOptions) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    let mut blank_lines = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|e| match e.kind() {
            io::ErrorKind::InvalidData => TextsenseError::format(line_no, "line is not valid UTF-8"),
            _ => TextsenseError::Io(e),
        })?;

        if options.has_header && index == 0 {
            debug!("Skipping header line: {line}");
            continue;
        }

        if line.trim().is_empty() {
            blank_lines += 1;
            continue;
        }

        records.push(parse_line(&line, line_no, options)?);
    }

    if blank_lines > 0 {
        warn!("Skipped {blank_lines} blank line(s)");
    }
    if records.is_empty() {
        return Err(TextsenseError::format(0, "no records found"));
    }

    Ok(records)
}

fn parse_line(line: &str, line_no: usize, options: &LoaderOptions) -> Result<Record> {
    let sep = options.separator;
    let columns = match options.column_order {
        ColumnOrder::LabelFirst => line.split_once(sep),
        ColumnOrder::TextFirst => line.rsplit_once(sep).map(|(text, label)| (label, text)),
    };
    let (label, text) = columns.ok_or_else(|| {
        TextsenseError::format(line_no, format!("expected 2 columns separated by {sep:?}"))
    })?;

    let label = parse_label(label).ok_or_else(|| {
        TextsenseError::format(line_no, format!("cannot parse label '{}'", label.trim()))
    })?;

    let text = if options.trim_text { text.trim() } else { text };
    if text.trim().is_empty() {
        return Err(TextsenseError::format(line_no, "text column is empty"));
    }

    Ok(Record::labeled(text, label))
}

/// Parse a boolean label: `true`/`false` (any case) or a number, where
/// positive values are `true`.
pub fn parse_label(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        return Some(true);
    }
    if value.eq_ignore_ascii_case("false") {
        return Some(false);
    }
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => Some(number > 0.0),
        _ => None,
    }
}
