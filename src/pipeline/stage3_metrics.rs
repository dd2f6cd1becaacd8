use crate::model::classifiers::ClassifierSpec;
use crate::model::metrics::{accuracy, macro_scores, weighted_accuracy};
use crate::pipeline::EvalError;
use crate::pipeline::stage2_loo::ClassifierRecord;
use crate::report::ResultRow;

/// One result row per classifier record of a single label set.
pub fn run_stage3(
    label_set: &str,
    records: &[ClassifierRecord],
) -> Result<Vec<ResultRow>, EvalError> {
    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        let w_accuracy = weighted_accuracy(&record.true_pos_weights, &record.self_weights)
            .ok_or_else(|| EvalError::ZeroSelfWeight {
                label_set: label_set.to_string(),
                classifier: record.name.clone(),
            })?;
        let scores = macro_scores(&record.true_labels, &record.pred_labels);
        rows.push(ResultRow {
            classifier: record.name.clone(),
            label_set: label_set.to_string(),
            accuracy: accuracy(&record.true_labels, &record.pred_labels),
            weighted_accuracy: w_accuracy,
            precision: scores.precision,
            recall: scores.recall,
            f1_score: scores.f1,
        });
    }
    Ok(rows)
}

/// Classifier-major ordering: every label set of the first classifier, then
/// every label set of the second, and so on. Label sets keep their input order.
pub fn order_rows(
    classifiers: &[ClassifierSpec],
    per_label_set: Vec<Vec<ResultRow>>,
) -> Vec<ResultRow> {
    let total = per_label_set.iter().map(Vec::len).sum();
    let mut out = Vec::with_capacity(total);
    for spec in classifiers {
        for rows in &per_label_set {
            out.extend(rows.iter().filter(|r| r.classifier == spec.name).cloned());
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_metrics.rs"]
mod tests;
