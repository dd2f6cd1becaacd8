use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use crate::input::{InputError, normalize_label, open_maybe_gz};

pub const TRUE_LABEL_COLUMN: &str = "ROT_i";
pub const PREDICTED_LABEL_COLUMN: &str = "ROT_j";
pub const WEIGHT_COLUMN: &str = "a_ij";

/// Pairwise label weights for one label set, keyed by (true, predicted).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoringMatrix {
    weights: BTreeMap<String, BTreeMap<String, f64>>,
    n_entries: usize,
}

impl ScoringMatrix {
    pub fn from_entries<I, S>(entries: I) -> Result<Self, InputError>
    where
        I: IntoIterator<Item = (S, S, f64)>,
        S: AsRef<str>,
    {
        let mut matrix = ScoringMatrix::default();
        for (true_label, predicted_label, weight) in entries {
            matrix.insert(
                normalize_label(true_label.as_ref()),
                normalize_label(predicted_label.as_ref()),
                weight,
            )?;
        }
        Ok(matrix)
    }

    fn insert(
        &mut self,
        true_label: String,
        predicted_label: String,
        weight: f64,
    ) -> Result<(), InputError> {
        let row = self.weights.entry(true_label.clone()).or_default();
        if row.contains_key(&predicted_label) {
            return Err(InputError::InvalidInput(format!(
                "duplicate scoring matrix entry ({true_label}, {predicted_label})"
            )));
        }
        row.insert(predicted_label, weight);
        self.n_entries += 1;
        Ok(())
    }

    pub fn weight(&self, true_label: &str, predicted_label: &str) -> Option<f64> {
        self.weights
            .get(true_label)
            .and_then(|row| row.get(predicted_label))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.n_entries
    }

    pub fn is_empty(&self) -> bool {
        self.n_entries == 0
    }
}

pub fn load_matrix(path: &Path) -> Result<ScoringMatrix, InputError> {
    let reader = open_maybe_gz(path)?;
    let matrix = parse_matrix(reader)?;
    tracing::debug!(
        "loaded {} scoring matrix entries from {}",
        matrix.len(),
        path.display()
    );
    Ok(matrix)
}

pub fn parse_matrix<R: Read>(reader: R) -> Result<ScoringMatrix, InputError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header = rdr.headers()?.clone();
    let column_of = |name: &str| -> Result<usize, InputError> {
        header.iter().position(|h| h == name).ok_or_else(|| {
            InputError::MissingInput(format!(
                "column `{name}` not found in scoring matrix header"
            ))
        })
    };
    let true_col = column_of(TRUE_LABEL_COLUMN)?;
    let pred_col = column_of(PREDICTED_LABEL_COLUMN)?;
    let weight_col = column_of(WEIGHT_COLUMN)?;

    let mut entries = Vec::new();
    for (row_idx, record) in rdr.records().enumerate() {
        let record = record?;
        let line_no = row_idx + 2;
        let raw_weight = record.get(weight_col).unwrap_or("");
        let weight = raw_weight.parse::<f64>().map_err(|_| {
            InputError::Parse(format!(
                "line {line_no}: `{WEIGHT_COLUMN}` has non-numeric value `{raw_weight}`"
            ))
        })?;
        entries.push((
            record.get(true_col).unwrap_or("").to_string(),
            record.get(pred_col).unwrap_or("").to_string(),
            weight,
        ));
    }

    let matrix = ScoringMatrix::from_entries(entries)?;
    if matrix.is_empty() {
        return Err(InputError::InvalidInput(
            "scoring matrix has no entries".to_string(),
        ));
    }
    Ok(matrix)
}
