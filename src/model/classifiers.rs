use std::fmt;

use serde::{Deserialize, Serialize};

pub const RANDOM_GUESS_NAME: &str = "Random Guess";

/// A group of classifiers evaluated together and written to one results file.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierFamily {
    Dt,
    Nb,
    Knn,
    Svm,
}

impl ClassifierFamily {
    pub fn all() -> [ClassifierFamily; 4] {
        [
            ClassifierFamily::Dt,
            ClassifierFamily::Nb,
            ClassifierFamily::Knn,
            ClassifierFamily::Svm,
        ]
    }

    pub fn id(self) -> &'static str {
        match self {
            ClassifierFamily::Dt => "dt",
            ClassifierFamily::Nb => "nb",
            ClassifierFamily::Knn => "knn",
            ClassifierFamily::Svm => "svm",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ClassifierFamily::Dt => "decision trees (linfa-trees)",
            ClassifierFamily::Nb => "gaussian naive bayes (linfa-bayes)",
            ClassifierFamily::Knn => "k-nearest neighbours, k-d tree (linfa-nn)",
            ClassifierFamily::Svm => "one-vs-all RBF support vector machines (linfa-svm)",
        }
    }
}

impl fmt::Display for ClassifierFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelParams {
    DecisionTree { max_depth: Option<usize> },
    GaussianNb,
    Knn { k: usize },
    SvmRbf { eps: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClassifierKind {
    Model(ModelParams),
    RandomGuess,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierSpec {
    pub name: String,
    pub kind: ClassifierKind,
}

impl ClassifierSpec {
    pub fn model(name: impl Into<String>, params: ModelParams) -> Self {
        Self {
            name: name.into(),
            kind: ClassifierKind::Model(params),
        }
    }

    pub fn random_guess() -> Self {
        Self {
            name: RANDOM_GUESS_NAME.to_string(),
            kind: ClassifierKind::RandomGuess,
        }
    }
}

/// Members of a family, in output order. The random-guess baseline is always
/// the last member.
pub fn family_classifiers(family: ClassifierFamily) -> Vec<ClassifierSpec> {
    let mut out = match family {
        ClassifierFamily::Dt => [None, Some(5), Some(10)]
            .into_iter()
            .map(|max_depth| {
                let name = match max_depth {
                    Some(d) => format!("DecisionTree_depth_{d}"),
                    None => "DecisionTree_depth_none".to_string(),
                };
                ClassifierSpec::model(name, ModelParams::DecisionTree { max_depth })
            })
            .collect::<Vec<_>>(),
        ClassifierFamily::Nb => vec![ClassifierSpec::model(
            "GaussianNB",
            ModelParams::GaussianNb,
        )],
        ClassifierFamily::Knn => [1usize, 3, 5]
            .into_iter()
            .map(|k| ClassifierSpec::model(format!("KNN_k_{k}"), ModelParams::Knn { k }))
            .collect(),
        ClassifierFamily::Svm => [10.0f64, 100.0]
            .into_iter()
            .map(|eps| {
                ClassifierSpec::model(format!("SVM_rbf_eps_{eps}"), ModelParams::SvmRbf { eps })
            })
            .collect(),
    };
    out.push(ClassifierSpec::random_guess());
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/classifiers.rs"]
mod tests;
