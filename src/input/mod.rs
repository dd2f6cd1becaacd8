use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;

pub mod dataset;
pub mod matrix;

pub use dataset::{Dataset, DatasetSchema, load_dataset};
pub use matrix::{ScoringMatrix, load_matrix};

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("parse error: {0}")]
    Parse(String),
}

pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn Read>, InputError> {
    if !path.is_file() {
        return Err(InputError::MissingInput(format!(
            "{} does not exist",
            path.display()
        )));
    }
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(GzDecoder::new(BufReader::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Canonical spelling of a categorical label.
///
/// Only plain decimal integers with an all-zero fraction are rewritten, so
/// `"7"`, `" 7 "` and `"7.0"` all become `"7"` while `"1e3"` and `"07"` are
/// kept as written.
pub fn normalize_label(raw: &str) -> String {
    let trimmed = raw.trim();
    let unsigned = trimmed.strip_prefix('-').unwrap_or(trimmed);
    let int_digits = match unsigned.split_once('.') {
        Some((int_part, frac)) if !frac.is_empty() && frac.bytes().all(|b| b == b'0') => int_part,
        Some(_) => return trimmed.to_string(),
        None => unsigned,
    };
    if int_digits.is_empty() || !int_digits.bytes().all(|b| b.is_ascii_digit()) {
        return trimmed.to_string();
    }
    let sign_len = trimmed.len() - unsigned.len();
    trimmed[..sign_len + int_digits.len()].to_string()
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
