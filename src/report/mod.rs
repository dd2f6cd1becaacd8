use serde::{Deserialize, Serialize};

pub mod json;
pub mod table;

/// Header of the results CSV, in column order.
pub const RESULT_COLUMNS: [&str; 7] = [
    "02_ClassifierName",
    "03_Groups",
    "04_Accuracy",
    "05_W_Accuracy",
    "06_precision",
    "07_recall",
    "08_f1_score",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    #[serde(rename = "02_ClassifierName")]
    pub classifier: String,
    #[serde(rename = "03_Groups")]
    pub label_set: String,
    #[serde(rename = "04_Accuracy")]
    pub accuracy: f64,
    #[serde(rename = "05_W_Accuracy")]
    pub weighted_accuracy: f64,
    #[serde(rename = "06_precision")]
    pub precision: f64,
    #[serde(rename = "07_recall")]
    pub recall: f64,
    #[serde(rename = "08_f1_score")]
    pub f1_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelSetFailure {
    pub label_set: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub tool: String,
    pub version: String,
    pub family: String,
    pub seed: u64,
    pub n_samples: usize,
    pub features: Vec<String>,
    pub classifiers: Vec<String>,
    pub label_sets_evaluated: Vec<String>,
    pub failures: Vec<LabelSetFailure>,
    pub n_rows: usize,
}

pub fn format_f64_6(v: f64) -> String {
    format!("{:.6}", v)
}
