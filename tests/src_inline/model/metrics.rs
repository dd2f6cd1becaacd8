use super::*;

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}

#[test]
fn test_accuracy() {
    let t = labels(&["a", "b", "c", "a"]);
    let p = labels(&["a", "b", "a", "c"]);
    assert_close(accuracy(&t, &p), 0.5);
    assert_close(accuracy(&[], &[]), 0.0);
}

#[test]
fn test_macro_scores_multiclass() {
    // same case as the scikit-learn precision_recall_fscore_support docs
    let t = labels(&["cat", "dog", "pig", "cat", "dog", "pig"]);
    let p = labels(&["cat", "pig", "dog", "cat", "cat", "dog"]);
    let s = macro_scores(&t, &p);
    assert_close(s.precision, 2.0 / 9.0);
    assert_close(s.recall, 1.0 / 3.0);
    assert_close(s.f1, 0.8 / 3.0);
}

#[test]
fn test_macro_scores_counts_predicted_only_labels() {
    // "b" never occurs as a true label but still enters the average with zeros
    let t = labels(&["a", "a"]);
    let p = labels(&["a", "b"]);
    let s = macro_scores(&t, &p);
    assert_close(s.precision, 0.5);
    assert_close(s.recall, 0.25);
    assert_close(s.f1, (2.0 / 3.0) / 2.0);
}

#[test]
fn test_perfect_predictions() {
    let t = labels(&["a", "b", "b"]);
    let s = macro_scores(&t, &t);
    assert_close(s.precision, 1.0);
    assert_close(s.recall, 1.0);
    assert_close(s.f1, 1.0);
}

#[test]
fn test_weighted_accuracy() {
    assert_eq!(weighted_accuracy(&[2.0, 3.0], &[2.0, 3.0]), Some(1.0));
    assert_eq!(weighted_accuracy(&[2.0], &[2.0, 3.0, 5.0]), Some(0.2));
    assert_eq!(weighted_accuracy(&[], &[4.0]), Some(0.0));
    assert_eq!(weighted_accuracy(&[], &[0.0, 0.0]), None);
    assert_eq!(weighted_accuracy(&[], &[]), None);
}
