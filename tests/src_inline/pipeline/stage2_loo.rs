use super::*;
use crate::input::dataset::Sample;
use crate::model::classifiers::ModelParams;

fn sample(x: f64, seq: &str, label: &str) -> Sample {
    Sample {
        features: vec![x],
        seq: seq.to_string(),
        labels: vec![label.to_string()],
    }
}

fn dataset(samples: Vec<Sample>) -> Dataset {
    Dataset {
        features: vec!["x".to_string()],
        label_sets: vec!["ROT".to_string()],
        samples,
    }
}

fn full_matrix(labels: &[&str]) -> ScoringMatrix {
    let mut entries = Vec::new();
    for &t in labels {
        for &p in labels {
            let w = if t == p { 2.0 } else { -1.0 };
            entries.push((t, p, w));
        }
    }
    ScoringMatrix::from_entries(entries).unwrap()
}

#[test]
fn test_random_guess_draws_from_training_labels() {
    let ds = dataset(vec![
        sample(0.0, "AA", "1"),
        sample(0.1, "AA", "2"),
        sample(0.2, "AA", "3"),
        sample(0.3, "AC", "4"),
        sample(0.4, "AC", "5"),
        sample(0.5, "AC", "4"),
        sample(0.6, "AA", "1"),
    ]);
    let matrix = full_matrix(&["1", "2", "3", "4", "5"]);
    let classifiers = vec![ClassifierSpec::random_guess()];

    for seed in 0..20u64 {
        let records = run_stage2(&Stage2Inputs {
            dataset: &ds,
            label_set: 0,
            matrix: &matrix,
            classifiers: &classifiers,
            seed,
        })
        .unwrap();
        let record = &records[0];
        assert_eq!(record.pred_labels.len(), ds.n_samples());
        for (i, pred) in record.pred_labels.iter().enumerate() {
            let allowed: Vec<&str> = ds
                .samples
                .iter()
                .enumerate()
                .filter(|(j, s)| *j != i && s.seq == ds.samples[i].seq)
                .map(|(_, s)| s.labels[0].as_str())
                .collect();
            assert!(
                allowed.contains(&pred.as_str()),
                "seed {seed}: sample {i} predicted {pred}, allowed {allowed:?}"
            );
        }
    }
}

#[test]
fn test_random_guess_is_reproducible() {
    let ds = dataset(vec![
        sample(0.0, "AA", "1"),
        sample(0.1, "AA", "2"),
        sample(0.2, "AA", "3"),
        sample(0.3, "AA", "2"),
    ]);
    let matrix = full_matrix(&["1", "2", "3"]);
    let classifiers = vec![ClassifierSpec::random_guess()];
    let inputs = Stage2Inputs {
        dataset: &ds,
        label_set: 0,
        matrix: &matrix,
        classifiers: &classifiers,
        seed: 7,
    };
    assert_eq!(run_stage2(&inputs).unwrap(), run_stage2(&inputs).unwrap());
}

#[test]
fn test_records_weights() {
    let ds = dataset(vec![
        sample(0.0, "AA", "A"),
        sample(0.1, "AA", "A"),
        sample(5.0, "AA", "B"),
    ]);
    let matrix = full_matrix(&["A", "B"]);
    let classifiers = vec![ClassifierSpec::model(
        "knn1",
        ModelParams::Knn { k: 1 },
    )];
    let records = run_stage2(&Stage2Inputs {
        dataset: &ds,
        label_set: 0,
        matrix: &matrix,
        classifiers: &classifiers,
        seed: 0,
    })
    .unwrap();

    let r = &records[0];
    assert_eq!(r.name, "knn1");
    assert_eq!(r.true_labels, vec!["A", "A", "B"]);
    // the B sample's nearest training row is an A
    assert_eq!(r.pred_labels, vec!["A", "A", "A"]);
    assert_eq!(r.true_pos_weights, vec![2.0, 2.0]);
    assert_eq!(r.self_weights, vec![2.0, 2.0, 2.0]);
}

#[test]
fn test_single_label_training_set_predicts_it() {
    let ds = dataset(vec![
        sample(0.0, "AA", "A"),
        sample(9.0, "AA", "A"),
        sample(3.0, "AA", "A"),
    ]);
    let matrix = full_matrix(&["A"]);
    let classifiers = vec![
        ClassifierSpec::model("svm", ModelParams::SvmRbf { eps: 10.0 }),
        ClassifierSpec::model("nb", ModelParams::GaussianNb),
    ];
    let records = run_stage2(&Stage2Inputs {
        dataset: &ds,
        label_set: 0,
        matrix: &matrix,
        classifiers: &classifiers,
        seed: 0,
    })
    .unwrap();
    for r in &records {
        assert_eq!(r.pred_labels, vec!["A", "A", "A"]);
    }
}

#[test]
fn test_gaussian_nb_on_constant_features_predicts_majority() {
    let ds = dataset(vec![
        sample(1.0, "AA", "A"),
        sample(1.0, "AA", "B"),
        sample(1.0, "AA", "B"),
        sample(1.0, "AA", "B"),
    ]);
    let matrix = full_matrix(&["A", "B"]);
    let classifiers = vec![ClassifierSpec::model("nb", ModelParams::GaussianNb)];
    let records = run_stage2(&Stage2Inputs {
        dataset: &ds,
        label_set: 0,
        matrix: &matrix,
        classifiers: &classifiers,
        seed: 0,
    })
    .unwrap();
    assert_eq!(records[0].pred_labels, vec!["B", "B", "B", "B"]);
}

#[test]
fn test_empty_training_set_is_an_error() {
    let ds = dataset(vec![
        sample(0.0, "AA", "A"),
        sample(0.1, "AA", "B"),
        sample(0.2, "GU", "A"),
    ]);
    let matrix = full_matrix(&["A", "B"]);
    let classifiers = vec![ClassifierSpec::random_guess()];
    let err = run_stage2(&Stage2Inputs {
        dataset: &ds,
        label_set: 0,
        matrix: &matrix,
        classifiers: &classifiers,
        seed: 0,
    })
    .unwrap_err();
    match err {
        EvalError::EmptyTrainingSet {
            label_set,
            sample,
            seq,
        } => {
            assert_eq!(label_set, "ROT");
            assert_eq!(sample, 2);
            assert_eq!(seq, "GU");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_matrix_entry_is_an_error() {
    let ds = dataset(vec![sample(0.0, "AA", "A"), sample(0.1, "AA", "B")]);
    // no (B, B) self weight
    let matrix = ScoringMatrix::from_entries(vec![("A", "A", 1.0), ("A", "B", 0.0), ("B", "A", 0.0)])
        .unwrap();
    let classifiers = vec![ClassifierSpec::random_guess()];
    let err = run_stage2(&Stage2Inputs {
        dataset: &ds,
        label_set: 0,
        matrix: &matrix,
        classifiers: &classifiers,
        seed: 0,
    })
    .unwrap_err();
    assert!(matches!(
        err,
        EvalError::MissingMatrixEntry { sample: 1, ref true_label, .. } if true_label == "B"
    ));
}

#[test]
fn test_distinct_labels_sorted() {
    assert_eq!(distinct_labels(&["b", "a", "b", "c"]), vec!["a", "b", "c"]);
}
