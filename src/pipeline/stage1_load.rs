use std::collections::BTreeMap;

use crate::input::{Dataset, DatasetSchema, InputError, ScoringMatrix, load_dataset, load_matrix};
use crate::model::config::EvalConfig;

#[derive(Debug)]
pub struct Stage1Output {
    pub dataset: Dataset,
    pub matrices: BTreeMap<String, ScoringMatrix>,
    /// Label sets whose scoring matrix could not be loaded, with the reason.
    pub matrix_errors: BTreeMap<String, String>,
}

impl Stage1Output {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            matrices: BTreeMap::new(),
            matrix_errors: BTreeMap::new(),
        }
    }
}

/// A dataset failure aborts the run; a matrix failure only takes its label set
/// out of the evaluation.
pub fn run_stage1(config: &EvalConfig) -> Result<Stage1Output, InputError> {
    let schema = DatasetSchema {
        features: &config.features,
        seq_column: &config.seq_column,
        label_sets: &config.label_sets,
    };
    let dataset = load_dataset(&config.dataset, &schema)?;
    let mut out = Stage1Output::new(dataset);

    for label_set in &config.label_sets {
        let path = config.matrix_path(label_set);
        match load_matrix(&path) {
            Ok(matrix) => {
                out.matrices.insert(label_set.clone(), matrix);
            }
            Err(err) => {
                tracing::warn!(
                    "scoring matrix for label set `{}` unavailable ({}): {}",
                    label_set,
                    path.display(),
                    err
                );
                out.matrix_errors
                    .insert(label_set.clone(), format!("{}: {err}", path.display()));
            }
        }
    }

    Ok(out)
}
