use std::collections::BTreeSet;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use crate::input::{Dataset, ScoringMatrix};
use crate::model::backend::{BackendError, TrainingSet, fit_predict};
use crate::model::classifiers::{ClassifierKind, ClassifierSpec};
use crate::model::labels::LabelEncoder;
use crate::pipeline::EvalError;

/// Everything one classifier produced across the leave-one-out iterations of
/// a single label set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifierRecord {
    pub name: String,
    pub true_labels: Vec<String>,
    pub pred_labels: Vec<String>,
    pub true_pos_weights: Vec<f64>,
    pub self_weights: Vec<f64>,
}

impl ClassifierRecord {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    fn push(&mut self, true_label: &str, pred_label: String, weight: f64, self_weight: f64) {
        if true_label == pred_label {
            self.true_pos_weights.push(weight);
        }
        self.self_weights.push(self_weight);
        self.true_labels.push(true_label.to_string());
        self.pred_labels.push(pred_label);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Stage2Inputs<'a> {
    pub dataset: &'a Dataset,
    pub label_set: usize,
    pub matrix: &'a ScoringMatrix,
    pub classifiers: &'a [ClassifierSpec],
    pub seed: u64,
}

impl Stage2Inputs<'_> {
    fn label_set_name(&self) -> &str {
        &self.dataset.label_sets[self.label_set]
    }
}

/// Holds out each sample once and trains on the remaining samples that share
/// its sequence identifier.
pub fn run_stage2(inputs: &Stage2Inputs<'_>) -> Result<Vec<ClassifierRecord>, EvalError> {
    let dataset = inputs.dataset;
    let ls = inputs.label_set;
    let label_set = inputs.label_set_name();

    let encoder = LabelEncoder::fit(dataset.samples.iter().map(|s| s.labels[ls].as_str()));
    let groups = dataset.seq_groups();
    let mut rng = StdRng::seed_from_u64(inputs.seed);

    let mut records: Vec<ClassifierRecord> = inputs
        .classifiers
        .iter()
        .map(|c| ClassifierRecord::new(&c.name))
        .collect();

    for (test_idx, test) in dataset.samples.iter().enumerate() {
        let train_idx: Vec<usize> = groups
            .get(test.seq.as_str())
            .map(|members| {
                members
                    .iter()
                    .copied()
                    .filter(|&i| i != test_idx)
                    .collect()
            })
            .unwrap_or_default();
        if train_idx.is_empty() {
            return Err(EvalError::EmptyTrainingSet {
                label_set: label_set.to_string(),
                sample: test_idx,
                seq: test.seq.clone(),
            });
        }

        let true_label = test.labels[ls].as_str();
        let train_labels: Vec<&str> = train_idx
            .iter()
            .map(|&i| dataset.label(i, ls))
            .collect();
        let observed = distinct_labels(&train_labels);

        let needs_fit = observed.len() > 1
            && inputs
                .classifiers
                .iter()
                .any(|c| matches!(c.kind, ClassifierKind::Model(_)));
        let training = if needs_fit {
            let train = build_training_set(dataset, &train_idx, &train_labels, &encoder)
                .map_err(|source| EvalError::Training {
                    label_set: label_set.to_string(),
                    sample: test_idx,
                    source,
                })?;
            Some(train)
        } else {
            None
        };

        for (spec, record) in inputs.classifiers.iter().zip(records.iter_mut()) {
            let pred_label = match (spec.kind, training.as_ref()) {
                (ClassifierKind::RandomGuess, _) => observed
                    .choose(&mut rng)
                    .map(|l| l.to_string())
                    .unwrap_or_default(),
                // a single observed label is the only possible fitted outcome
                (ClassifierKind::Model(_), None) => observed[0].to_string(),
                (ClassifierKind::Model(params), Some(train)) => {
                    let class_id = fit_predict(&params, train, &test.features).map_err(
                        |source| EvalError::Backend {
                            label_set: label_set.to_string(),
                            classifier: spec.name.clone(),
                            sample: test_idx,
                            source,
                        },
                    )?;
                    encoder
                        .decode(class_id)
                        .map(str::to_string)
                        .ok_or_else(|| EvalError::UnknownClass {
                            label_set: label_set.to_string(),
                            classifier: spec.name.clone(),
                            class_id,
                        })?
                }
            };

            let weight = lookup_weight(inputs.matrix, label_set, test_idx, true_label, &pred_label)?;
            let self_weight =
                lookup_weight(inputs.matrix, label_set, test_idx, true_label, true_label)?;
            record.push(true_label, pred_label, weight, self_weight);
        }
    }

    tracing::debug!(
        "label set `{}`: {} leave-one-out iterations, {} classes, {} classifiers",
        label_set,
        dataset.n_samples(),
        encoder.n_classes(),
        inputs.classifiers.len()
    );
    Ok(records)
}

/// Distinct labels in sorted order.
pub fn distinct_labels<'a>(labels: &[&'a str]) -> Vec<&'a str> {
    let set: BTreeSet<&str> = labels.iter().copied().collect();
    set.into_iter().collect()
}

fn build_training_set(
    dataset: &Dataset,
    train_idx: &[usize],
    train_labels: &[&str],
    encoder: &LabelEncoder,
) -> Result<TrainingSet, BackendError> {
    let rows: Vec<&[f64]> = train_idx
        .iter()
        .map(|&i| dataset.samples[i].features.as_slice())
        .collect();
    // every training label came from the dataset the encoder was fitted on
    let targets: Vec<usize> = train_labels
        .iter()
        .map(|l| encoder.encode(l).unwrap_or_default())
        .collect();
    TrainingSet::from_rows(&rows, targets, dataset.n_features())
}

fn lookup_weight(
    matrix: &ScoringMatrix,
    label_set: &str,
    sample: usize,
    true_label: &str,
    pred_label: &str,
) -> Result<f64, EvalError> {
    matrix
        .weight(true_label, pred_label)
        .ok_or_else(|| EvalError::MissingMatrixEntry {
            label_set: label_set.to_string(),
            sample,
            true_label: true_label.to_string(),
            predicted_label: pred_label.to_string(),
        })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_loo.rs"]
mod tests;
