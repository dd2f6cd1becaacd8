use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use crate::input::{InputError, normalize_label, open_maybe_gz};

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub features: Vec<f64>,
    pub seq: String,
    /// One label per label set, in the order of `Dataset::label_sets`.
    pub labels: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Dataset {
    pub features: Vec<String>,
    pub label_sets: Vec<String>,
    pub samples: Vec<Sample>,
}

#[derive(Debug, Clone, Copy)]
pub struct DatasetSchema<'a> {
    pub features: &'a [String],
    pub seq_column: &'a str,
    pub label_sets: &'a [String],
}

impl Dataset {
    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn n_features(&self) -> usize {
        self.features.len()
    }

    pub fn label(&self, sample: usize, label_set: usize) -> &str {
        &self.samples[sample].labels[label_set]
    }

    /// Sample indices grouped by sequence identifier.
    pub fn seq_groups(&self) -> BTreeMap<&str, Vec<usize>> {
        let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (idx, sample) in self.samples.iter().enumerate() {
            groups.entry(sample.seq.as_str()).or_default().push(idx);
        }
        groups
    }
}

pub fn load_dataset(path: &Path, schema: &DatasetSchema<'_>) -> Result<Dataset, InputError> {
    let reader = open_maybe_gz(path)?;
    let dataset = parse_dataset(reader, schema)?;
    tracing::info!(
        "loaded {} samples ({} features, {} label sets) from {}",
        dataset.n_samples(),
        dataset.n_features(),
        dataset.label_sets.len(),
        path.display()
    );
    Ok(dataset)
}

pub fn parse_dataset<R: Read>(
    reader: R,
    schema: &DatasetSchema<'_>,
) -> Result<Dataset, InputError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header = rdr.headers()?.clone();
    let column_of = |name: &str| -> Result<usize, InputError> {
        header.iter().position(|h| h == name).ok_or_else(|| {
            InputError::MissingInput(format!("column `{name}` not found in dataset header"))
        })
    };

    let feature_cols = schema
        .features
        .iter()
        .map(|f| column_of(f))
        .collect::<Result<Vec<_>, _>>()?;
    let seq_col = column_of(schema.seq_column)?;
    let label_cols = schema
        .label_sets
        .iter()
        .map(|l| column_of(l))
        .collect::<Result<Vec<_>, _>>()?;

    let mut samples = Vec::new();
    for (row_idx, record) in rdr.records().enumerate() {
        let record = record?;
        // header is line 1
        let line_no = row_idx + 2;

        let mut features = Vec::with_capacity(feature_cols.len());
        for (&col, name) in feature_cols.iter().zip(schema.features) {
            let raw = record.get(col).unwrap_or("");
            let value = raw.parse::<f64>().map_err(|_| {
                InputError::Parse(format!(
                    "line {line_no}: feature `{name}` has non-numeric value `{raw}`"
                ))
            })?;
            if !value.is_finite() {
                return Err(InputError::Parse(format!(
                    "line {line_no}: feature `{name}` is not finite"
                )));
            }
            features.push(value);
        }

        let seq = record.get(seq_col).unwrap_or("").to_string();
        if seq.is_empty() {
            tracing::warn!("line {line_no}: empty sequence identifier");
        }

        let mut labels = Vec::with_capacity(label_cols.len());
        for (&col, name) in label_cols.iter().zip(schema.label_sets) {
            let label = normalize_label(record.get(col).unwrap_or(""));
            if label.is_empty() {
                return Err(InputError::Parse(format!(
                    "line {line_no}: label set `{name}` has an empty label"
                )));
            }
            labels.push(label);
        }

        samples.push(Sample {
            features,
            seq,
            labels,
        });
    }

    if samples.is_empty() {
        return Err(InputError::InvalidInput("dataset has no rows".to_string()));
    }

    Ok(Dataset {
        features: schema.features.to_vec(),
        label_sets: schema.label_sets.to_vec(),
        samples,
    })
}
