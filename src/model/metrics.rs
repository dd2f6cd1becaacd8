use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroScores {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

#[derive(Debug, Clone, Copy, Default)]
struct LabelCounts {
    tp: usize,
    fp: usize,
    fn_: usize,
}

pub fn accuracy(true_labels: &[String], pred_labels: &[String]) -> f64 {
    let n = true_labels.len().min(pred_labels.len());
    if n == 0 {
        return 0.0;
    }
    let correct = true_labels
        .iter()
        .zip(pred_labels)
        .filter(|(t, p)| t == p)
        .count();
    correct as f64 / n as f64
}

/// Unweighted mean of per-label precision, recall and F1 over every label seen
/// in either list. A label with a zero denominator contributes 0.
pub fn macro_scores(true_labels: &[String], pred_labels: &[String]) -> MacroScores {
    let mut counts: BTreeMap<&str, LabelCounts> = BTreeMap::new();
    for (t, p) in true_labels.iter().zip(pred_labels) {
        if t == p {
            counts.entry(t.as_str()).or_default().tp += 1;
        } else {
            counts.entry(t.as_str()).or_default().fn_ += 1;
            counts.entry(p.as_str()).or_default().fp += 1;
        }
    }
    if counts.is_empty() {
        return MacroScores {
            precision: 0.0,
            recall: 0.0,
            f1: 0.0,
        };
    }

    let mut precision = 0.0;
    let mut recall = 0.0;
    let mut f1 = 0.0;
    for c in counts.values() {
        precision += safe_ratio(c.tp, c.tp + c.fp);
        recall += safe_ratio(c.tp, c.tp + c.fn_);
        f1 += safe_ratio(2 * c.tp, 2 * c.tp + c.fp + c.fn_);
    }
    let n = counts.len() as f64;
    MacroScores {
        precision: precision / n,
        recall: recall / n,
        f1: f1 / n,
    }
}

/// Sum of true-positive weights over the sum of self weights, `None` when the
/// self weights sum to zero.
pub fn weighted_accuracy(true_pos_weights: &[f64], self_weights: &[f64]) -> Option<f64> {
    let denom: f64 = self_weights.iter().sum();
    if denom == 0.0 {
        return None;
    }
    let numer: f64 = true_pos_weights.iter().sum();
    Some(numer / denom)
}

fn safe_ratio(num: usize, denom: usize) -> f64 {
    if denom == 0 {
        0.0
    } else {
        num as f64 / denom as f64
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/metrics.rs"]
mod tests;
