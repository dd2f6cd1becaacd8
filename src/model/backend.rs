//! Fit-and-predict adapters over the linfa estimators.
//!
//! Each call fits a fresh model on the training rows and returns the class id
//! predicted for a single test row. Class ids come from a
//! [`LabelEncoder`](crate::model::labels::LabelEncoder).

use std::collections::BTreeMap;

use linfa::DatasetBase;
use linfa::composing::MultiClassModel;
use linfa::prelude::Pr;
use linfa::traits::{Fit, Predict};
use linfa_bayes::GaussianNb;
use linfa_nn::distance::L2Dist;
use linfa_nn::{CommonNearestNeighbour, NearestNeighbour};
use linfa_svm::Svm;
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2};

use crate::model::classifiers::ModelParams;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("fit failed: {0}")]
    Fit(String),
    #[error("prediction failed: {0}")]
    Predict(String),
    #[error("training set is empty")]
    EmptyTrainingSet,
    #[error("feature row has {got} values, expected {expected}")]
    Shape { expected: usize, got: usize },
}

/// Training rows and their class ids.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    pub records: Array2<f64>,
    pub targets: Array1<usize>,
}

impl TrainingSet {
    pub fn from_rows(
        rows: &[&[f64]],
        targets: Vec<usize>,
        n_features: usize,
    ) -> Result<Self, BackendError> {
        if rows.is_empty() {
            return Err(BackendError::EmptyTrainingSet);
        }
        let mut flat = Vec::with_capacity(rows.len() * n_features);
        for row in rows {
            if row.len() != n_features {
                return Err(BackendError::Shape {
                    expected: n_features,
                    got: row.len(),
                });
            }
            flat.extend_from_slice(row);
        }
        let records = Array2::from_shape_vec((rows.len(), n_features), flat)
            .map_err(|e| BackendError::Fit(e.to_string()))?;
        Ok(Self {
            records,
            targets: Array1::from_vec(targets),
        })
    }

    pub fn n_samples(&self) -> usize {
        self.records.nrows()
    }
}

pub fn fit_predict(
    params: &ModelParams,
    train: &TrainingSet,
    test_row: &[f64],
) -> Result<usize, BackendError> {
    if train.n_samples() == 0 {
        return Err(BackendError::EmptyTrainingSet);
    }
    let n_features = train.records.ncols();
    if test_row.len() != n_features {
        return Err(BackendError::Shape {
            expected: n_features,
            got: test_row.len(),
        });
    }
    let test = Array2::from_shape_vec((1, n_features), test_row.to_vec())
        .map_err(|e| BackendError::Predict(e.to_string()))?;

    match *params {
        ModelParams::DecisionTree { max_depth } => predict_decision_tree(max_depth, train, &test),
        ModelParams::GaussianNb => predict_gaussian_nb(train, &test),
        ModelParams::Knn { k } => predict_knn(k, train, test_row),
        ModelParams::SvmRbf { eps } => predict_svm(eps, train, &test),
    }
}

fn dataset(train: &TrainingSet) -> DatasetBase<Array2<f64>, Array1<usize>> {
    DatasetBase::new(train.records.clone(), train.targets.clone())
}

fn first_class(predictions: &Array1<usize>) -> Result<usize, BackendError> {
    predictions
        .iter()
        .next()
        .copied()
        .ok_or_else(|| BackendError::Predict("got an empty prediction".to_string()))
}

fn predict_decision_tree(
    max_depth: Option<usize>,
    train: &TrainingSet,
    test: &Array2<f64>,
) -> Result<usize, BackendError> {
    let model = DecisionTree::<f64, usize>::params()
        .max_depth(max_depth)
        .fit(&dataset(train))
        .map_err(|e| BackendError::Fit(e.to_string()))?;
    let predictions: Array1<usize> = model.predict(test);
    first_class(&predictions)
}

/// With no feature variance every class has the same likelihood, so the
/// posterior reduces to the class prior and the most frequent class wins.
fn predict_gaussian_nb(train: &TrainingSet, test: &Array2<f64>) -> Result<usize, BackendError> {
    if !has_feature_variance(&train.records) {
        return majority_class(&train.targets.to_vec())
            .ok_or(BackendError::EmptyTrainingSet);
    }
    let model: GaussianNb<f64, usize> = GaussianNb::params()
        .fit(&dataset(train))
        .map_err(|e| BackendError::Fit(e.to_string()))?;
    let predictions: Array1<usize> = model.predict(test);
    first_class(&predictions)
}

/// Majority vote over the `k` nearest training rows.
fn predict_knn(k: usize, train: &TrainingSet, test_row: &[f64]) -> Result<usize, BackendError> {
    let k = k.clamp(1, train.n_samples());
    let index = CommonNearestNeighbour::KdTree
        .from_batch(&train.records, L2Dist)
        .map_err(|e| BackendError::Fit(e.to_string()))?;
    let point = ndarray::ArrayView1::from(test_row);
    let neighbours = index
        .k_nearest(point, k)
        .map_err(|e| BackendError::Predict(e.to_string()))?;

    let classes: Vec<usize> = neighbours
        .iter()
        .map(|(_, row_idx)| train.targets[*row_idx])
        .collect();
    majority_class(&classes)
        .ok_or_else(|| BackendError::Predict("no neighbours returned".to_string()))
}

/// Most frequent class id. Ties go to the smallest id.
pub fn majority_class(classes: &[usize]) -> Option<usize> {
    let mut votes: BTreeMap<usize, usize> = BTreeMap::new();
    for &class in classes {
        *votes.entry(class).or_default() += 1;
    }
    let best = votes.values().copied().max()?;
    votes
        .into_iter()
        .find(|&(_, count)| count == best)
        .map(|(class, _)| class)
}

/// True when at least one column holds two different values.
fn has_feature_variance(records: &Array2<f64>) -> bool {
    records.columns().into_iter().any(|column| {
        let mut values = column.iter();
        values
            .next()
            .is_some_and(|first| values.any(|v| v != first))
    })
}

fn predict_svm(eps: f64, train: &TrainingSet, test: &Array2<f64>) -> Result<usize, BackendError> {
    let params = Svm::<_, Pr>::params().gaussian_kernel(eps);
    let ds = dataset(train);
    let binary = ds
        .one_vs_all()
        .map_err(|e| BackendError::Fit(e.to_string()))?;

    let mut models: Vec<(usize, Svm<f64, Pr>)> = Vec::with_capacity(binary.len());
    for (class, subset) in binary {
        let model = params
            .fit(&subset)
            .map_err(|e| BackendError::Fit(format!("class {class}: {e}")))?;
        models.push((class, model));
    }

    let multi: MultiClassModel<Array2<f64>, usize> = MultiClassModel::from_iter(models);
    let predictions: Array1<usize> = multi.predict(test);
    first_class(&predictions)
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/backend.rs"]
mod tests;
