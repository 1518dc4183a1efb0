//! # Delimited Sample Reader
//!
//! Reads one sample per line from tab-, whitespace- or comma-separated text.
//!
//! - Blank lines and lines starting with `#` are skipped.
//! - An optional header line is skipped.
//! - An optional first column holds the sample label.
//! - Every sample must have the same number of values; parse errors report
//!   the 1-based line number.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::data::SampleMatrix;
use crate::error::{DendraError, Result};

/// Field separator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// Any run of tabs or spaces
    Whitespace,
    Comma,
}

impl Delimiter {
    /// Comma for `.csv` files, whitespace otherwise
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Delimiter::Comma,
            _ => Delimiter::Whitespace,
        }
    }

    fn split<'a>(self, line: &'a str) -> Box<dyn Iterator<Item = &'a str> + 'a> {
        match self {
            Delimiter::Whitespace => Box::new(line.split_whitespace()),
            Delimiter::Comma => Box::new(line.split(',').map(str::trim)),
        }
    }
}

/// Reader options
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    pub delimiter: Delimiter,
    pub has_header: bool,
    pub has_labels: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: Delimiter::Whitespace,
            has_header: false,
            has_labels: false,
        }
    }
}

/// Samples loaded from a file: owned row-major values plus optional labels
#[derive(Debug, Clone, PartialEq)]
pub struct SampleTable {
    pub values: Vec<f32>,
    pub n_samples: usize,
    pub vector_size: usize,
    pub labels: Option<Vec<String>>,
}

impl SampleTable {
    /// Validated kernel view over the values
    pub fn matrix(&self) -> Result<SampleMatrix<'_>> {
        SampleMatrix::new(&self.values, self.n_samples, self.vector_size)
    }
}

/// Read a sample file from disk
pub fn read_samples(path: &Path, options: &ReadOptions) -> Result<SampleTable> {
    let file = File::open(path)?;
    parse_samples(BufReader::new(file), options)
}

/// Parse samples from any buffered reader
pub fn parse_samples<R: BufRead>(reader: R, options: &ReadOptions) -> Result<SampleTable> {
    let mut values = Vec::new();
    let mut labels = options.has_labels.then(Vec::new);
    let mut vector_size: Option<usize> = None;
    let mut n_samples = 0;
    let mut header_pending = options.has_header;

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = line_idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if header_pending {
            header_pending = false;
            continue;
        }

        let mut fields = options.delimiter.split(trimmed);
        if let Some(labels) = labels.as_mut() {
            let label = fields
                .next()
                .ok_or_else(|| DendraError::parse(line_no, "missing sample label"))?;
            labels.push(label.to_string());
        }

        let row_start = values.len();
        for field in fields {
            let value: f32 = field.parse().map_err(|_| {
                DendraError::parse(line_no, format!("invalid number '{}'", field))
            })?;
            values.push(value);
        }
        let row_len = values.len() - row_start;

        match vector_size {
            None if row_len == 0 => {
                return Err(DendraError::parse(line_no, "sample has no values"));
            }
            None => vector_size = Some(row_len),
            Some(expected) if expected != row_len => {
                return Err(DendraError::parse(
                    line_no,
                    format!("expected {} values, found {}", expected, row_len),
                ));
            }
            Some(_) => {}
        }
        n_samples += 1;
    }

    tracing::debug!(n_samples, vector_size = vector_size.unwrap_or(0), "samples read");
    Ok(SampleTable {
        values,
        n_samples,
        vector_size: vector_size.unwrap_or(0),
        labels,
    })
}
