pub mod stage1_load;
pub mod stage2_loo;
pub mod stage3_metrics;
pub mod stage4_report;

use crate::model::backend::BackendError;
use crate::model::classifiers::ClassifierSpec;
use crate::pipeline::stage1_load::Stage1Output;
use crate::pipeline::stage2_loo::{Stage2Inputs, run_stage2};
use crate::pipeline::stage3_metrics::{order_rows, run_stage3};
use crate::report::json::TOOL_NAME;
use crate::report::{LabelSetFailure, ResultRow, RunSummary};

/// Failures that abort the evaluation of one label set.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error(
        "label set `{label_set}`: sample {sample} (SEQ `{seq}`) has no other sample with the same sequence to train on"
    )]
    EmptyTrainingSet {
        label_set: String,
        sample: usize,
        seq: String,
    },
    #[error(
        "label set `{label_set}`: sample {sample}: scoring matrix has no entry for ({true_label}, {predicted_label})"
    )]
    MissingMatrixEntry {
        label_set: String,
        sample: usize,
        true_label: String,
        predicted_label: String,
    },
    #[error(
        "label set `{label_set}`, classifier `{classifier}`: self weights sum to zero, weighted accuracy is undefined"
    )]
    ZeroSelfWeight {
        label_set: String,
        classifier: String,
    },
    #[error("label set `{label_set}`: sample {sample}: cannot build training set: {source}")]
    Training {
        label_set: String,
        sample: usize,
        #[source]
        source: BackendError,
    },
    #[error("label set `{label_set}`, classifier `{classifier}`, sample {sample}: {source}")]
    Backend {
        label_set: String,
        classifier: String,
        sample: usize,
        #[source]
        source: BackendError,
    },
    #[error("label set `{label_set}`, classifier `{classifier}`: predicted unknown class id {class_id}")]
    UnknownClass {
        label_set: String,
        classifier: String,
        class_id: usize,
    },
}

#[derive(Debug, Clone, Default)]
pub struct FamilyOutcome {
    pub rows: Vec<ResultRow>,
    pub evaluated: Vec<String>,
    pub failures: Vec<LabelSetFailure>,
}

/// Runs every label set of the loaded data through one classifier family.
/// A failing label set is logged and recorded; the others still produce rows.
pub fn evaluate_classifiers(
    stage1: &Stage1Output,
    classifiers: &[ClassifierSpec],
    seed: u64,
) -> FamilyOutcome {
    let dataset = &stage1.dataset;
    let mut outcome = FamilyOutcome::default();
    let mut per_label_set = Vec::with_capacity(dataset.label_sets.len());

    for (ls_idx, label_set) in dataset.label_sets.iter().enumerate() {
        let Some(matrix) = stage1.matrices.get(label_set) else {
            let error = stage1
                .matrix_errors
                .get(label_set)
                .cloned()
                .unwrap_or_else(|| "no scoring matrix loaded".to_string());
            outcome.failures.push(LabelSetFailure {
                label_set: label_set.clone(),
                error,
            });
            continue;
        };

        let inputs = Stage2Inputs {
            dataset,
            label_set: ls_idx,
            matrix,
            classifiers,
            seed: seed.wrapping_add(ls_idx as u64),
        };
        let result = run_stage2(&inputs).and_then(|records| run_stage3(label_set, &records));
        match result {
            Ok(rows) => {
                tracing::info!(
                    "label set `{}`: evaluated {} classifiers over {} samples",
                    label_set,
                    rows.len(),
                    dataset.n_samples()
                );
                outcome.evaluated.push(label_set.clone());
                per_label_set.push(rows);
            }
            Err(err) => {
                tracing::error!("{err}");
                outcome.failures.push(LabelSetFailure {
                    label_set: label_set.clone(),
                    error: err.to_string(),
                });
            }
        }
    }

    outcome.rows = order_rows(classifiers, per_label_set);
    outcome
}

pub fn build_summary(
    stage1: &Stage1Output,
    family: &str,
    classifiers: &[ClassifierSpec],
    seed: u64,
    outcome: &FamilyOutcome,
) -> RunSummary {
    RunSummary {
        tool: TOOL_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        family: family.to_string(),
        seed,
        n_samples: stage1.dataset.n_samples(),
        features: stage1.dataset.features.clone(),
        classifiers: classifiers.iter().map(|c| c.name.clone()).collect(),
        label_sets_evaluated: outcome.evaluated.clone(),
        failures: outcome.failures.clone(),
        n_rows: outcome.rows.len(),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/mod.rs"]
mod tests;
