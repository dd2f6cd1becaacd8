use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::input::dataset::Sample;
use crate::input::{Dataset, ScoringMatrix};
use crate::model::classifiers::{ClassifierFamily, ModelParams, family_classifiers};
use crate::pipeline::stage4_report::{Stage4Input, write_reports};

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> std::path::PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("kira_rotamer_pipeline_test_{}_{}", std::process::id(), id));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn sample(x: f64, seq: &str, labels: &[&str]) -> Sample {
    Sample {
        features: vec![x, -x],
        seq: seq.to_string(),
        labels: labels.iter().map(|s| s.to_string()).collect(),
    }
}

fn identity_matrix(labels: &[&str]) -> ScoringMatrix {
    let mut entries = Vec::new();
    for &t in labels {
        for &p in labels {
            entries.push((t, p, if t == p { 1.0 } else { 0.0 }));
        }
    }
    ScoringMatrix::from_entries(entries).unwrap()
}

/// Two sequences with two well separated rotamers each; the family label is
/// constant so every classifier gets it right.
fn stage1() -> Stage1Output {
    let dataset = Dataset {
        features: vec!["delta".to_string(), "epsilon".to_string()],
        label_sets: vec!["ROT".to_string(), "FAM".to_string()],
        samples: vec![
            sample(0.0, "AA", &["1", "F"]),
            sample(0.2, "AA", &["1", "F"]),
            sample(0.1, "AA", &["1", "F"]),
            sample(9.0, "AA", &["2", "F"]),
            sample(9.2, "AA", &["2", "F"]),
            sample(9.1, "AA", &["2", "F"]),
            sample(0.0, "CG", &["1", "F"]),
            sample(0.3, "CG", &["1", "F"]),
            sample(5.0, "CG", &["3", "F"]),
            sample(5.1, "CG", &["3", "F"]),
        ],
    };
    let mut out = Stage1Output::new(dataset);
    out.matrices
        .insert("ROT".to_string(), identity_matrix(&["1", "2", "3"]));
    out.matrices.insert("FAM".to_string(), identity_matrix(&["F"]));
    out
}

#[test]
fn test_row_count_is_label_sets_times_classifiers() {
    let stage1 = stage1();
    for family in [ClassifierFamily::Dt, ClassifierFamily::Knn] {
        let classifiers = family_classifiers(family);
        let outcome = evaluate_classifiers(&stage1, &classifiers, 0);
        assert!(outcome.failures.is_empty(), "{:?}", outcome.failures);
        assert_eq!(outcome.rows.len(), 2 * classifiers.len());
        assert_eq!(outcome.evaluated, vec!["ROT", "FAM"]);
        for row in &outcome.rows {
            assert!((0.0..=1.0).contains(&row.accuracy));
            assert!((0.0..=1.0).contains(&row.weighted_accuracy));
        }
    }
}

#[test]
fn test_single_label_set_scores_one() {
    let stage1 = stage1();
    let classifiers = family_classifiers(ClassifierFamily::Knn);
    let outcome = evaluate_classifiers(&stage1, &classifiers, 11);
    let fam_rows: Vec<_> = outcome.rows.iter().filter(|r| r.label_set == "FAM").collect();
    assert_eq!(fam_rows.len(), classifiers.len());
    for row in fam_rows {
        assert_eq!(row.accuracy, 1.0);
        assert_eq!(row.weighted_accuracy, 1.0);
    }
}

#[test]
fn test_separable_rotamers_are_recovered() {
    let stage1 = stage1();
    let classifiers = vec![
        ClassifierSpec::model("knn1", ModelParams::Knn { k: 1 }),
        ClassifierSpec::model("tree", ModelParams::DecisionTree { max_depth: None }),
    ];
    let outcome = evaluate_classifiers(&stage1, &classifiers, 0);
    for row in outcome.rows.iter().filter(|r| r.label_set == "ROT") {
        assert_eq!(row.accuracy, 1.0, "{}", row.classifier);
        assert_eq!(row.weighted_accuracy, 1.0, "{}", row.classifier);
        assert_eq!(row.f1_score, 1.0, "{}", row.classifier);
    }
}

#[test]
fn test_failed_label_set_keeps_other_results() {
    let mut stage1 = stage1();
    stage1.matrices.remove("FAM");
    stage1
        .matrix_errors
        .insert("FAM".to_string(), "files/b_matrix_FAM.csv: missing".to_string());
    // the ROT matrix lacks rotamer 3, so ROT fails while scoring
    stage1
        .matrices
        .insert("ROT".to_string(), identity_matrix(&["1", "2"]));
    let classifiers = vec![ClassifierSpec::random_guess()];
    let outcome = evaluate_classifiers(&stage1, &classifiers, 0);
    assert!(outcome.rows.is_empty());
    assert_eq!(outcome.failures.len(), 2);
    assert_eq!(outcome.failures[0].label_set, "ROT");
    assert!(outcome.failures[0].error.contains("scoring matrix has no entry"));
    assert_eq!(outcome.failures[1].label_set, "FAM");
    assert!(outcome.failures[1].error.contains("missing"));

    let mut stage1 = self::stage1();
    stage1
        .matrices
        .insert("ROT".to_string(), identity_matrix(&["1", "2"]));
    let outcome = evaluate_classifiers(&stage1, &classifiers, 0);
    assert_eq!(outcome.evaluated, vec!["FAM"]);
    assert_eq!(outcome.rows.len(), 1);
    assert_eq!(outcome.rows[0].label_set, "FAM");
}

#[test]
fn test_three_sample_example_writes_three_rows() {
    let dataset = Dataset {
        features: vec!["delta".to_string(), "epsilon".to_string()],
        label_sets: vec!["ROT".to_string()],
        samples: vec![
            sample(0.0, "AA", &["A"]),
            sample(0.5, "AA", &["A"]),
            sample(8.0, "AA", &["B"]),
        ],
    };
    let mut stage1 = Stage1Output::new(dataset);
    stage1
        .matrices
        .insert("ROT".to_string(), identity_matrix(&["A", "B"]));

    let classifiers = vec![
        ClassifierSpec::model("DecisionTree_depth_none", ModelParams::DecisionTree { max_depth: None }),
        ClassifierSpec::model("KNN_k_1", ModelParams::Knn { k: 1 }),
        ClassifierSpec::random_guess(),
    ];
    let outcome = evaluate_classifiers(&stage1, &classifiers, 5);
    let summary = build_summary(&stage1, "demo", &classifiers, 5, &outcome);
    assert_eq!(summary.n_rows, 3);
    assert_eq!(summary.n_samples, 3);

    let dir = make_temp_dir();
    let results = dir.join("results_demo_expexp.csv");
    write_reports(
        &Stage4Input {
            rows: &outcome.rows,
            summary: &summary,
        },
        &results,
        &dir.join("summary_demo.json"),
    )
    .unwrap();

    let mut rdr = csv::Reader::from_path(&results).unwrap();
    let rows: Vec<ResultRow> = rdr.deserialize().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);
    for row in &rows {
        assert_eq!(row.label_set, "ROT");
        assert!((0.0..=1.0).contains(&row.accuracy));
    }
    assert_eq!(rows[2].classifier, "Random Guess");
}
