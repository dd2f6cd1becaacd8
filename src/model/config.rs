use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::classifiers::ClassifierFamily;

pub const LABEL_SET_PLACEHOLDER: &str = "{label_set}";
pub const FAMILY_PLACEHOLDER: &str = "{family}";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Run parameters. Every field has a default so a config file only needs to
/// name the columns of its dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvalConfig {
    pub dataset: PathBuf,
    pub matrix_template: String,
    pub output_dir: PathBuf,
    pub output_template: String,
    pub seq_column: String,
    pub features: Vec<String>,
    pub label_sets: Vec<String>,
    pub families: Vec<ClassifierFamily>,
    pub seed: u64,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from("files/ExperimentalDatabaseModel01.csv"),
            matrix_template: format!("files/b_matrix_{LABEL_SET_PLACEHOLDER}.csv"),
            output_dir: PathBuf::from("."),
            output_template: format!("results_{FAMILY_PLACEHOLDER}_expexp.csv"),
            seq_column: "SEQ".to_string(),
            features: Vec::new(),
            label_sets: Vec::new(),
            families: ClassifierFamily::all().to_vec(),
            seed: 0,
        }
    }
}

impl EvalConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.features.is_empty() {
            return Err(ConfigError::Invalid(
                "no feature columns declared".to_string(),
            ));
        }
        if self.label_sets.is_empty() {
            return Err(ConfigError::Invalid("no label sets declared".to_string()));
        }
        if self.families.is_empty() {
            return Err(ConfigError::Invalid(
                "no classifier families selected".to_string(),
            ));
        }
        if self.seq_column.trim().is_empty() {
            return Err(ConfigError::Invalid("seq_column is empty".to_string()));
        }
        check_unique("feature", self.features.iter().map(String::as_str))?;
        check_unique("label set", self.label_sets.iter().map(String::as_str))?;
        check_unique("family", self.families.iter().map(|f| f.id()))?;

        for name in self.features.iter().chain(&self.label_sets) {
            if *name == self.seq_column {
                return Err(ConfigError::Invalid(format!(
                    "column `{name}` is also the sequence column"
                )));
            }
        }
        if let Some(name) = self.label_sets.iter().find(|l| self.features.contains(*l)) {
            return Err(ConfigError::Invalid(format!(
                "column `{name}` is both a feature and a label set"
            )));
        }

        if !self.matrix_template.contains(LABEL_SET_PLACEHOLDER) {
            return Err(ConfigError::Invalid(format!(
                "matrix_template must contain {LABEL_SET_PLACEHOLDER}"
            )));
        }
        if !self.output_template.contains(FAMILY_PLACEHOLDER) {
            return Err(ConfigError::Invalid(format!(
                "output_template must contain {FAMILY_PLACEHOLDER}"
            )));
        }
        Ok(())
    }

    pub fn matrix_path(&self, label_set: &str) -> PathBuf {
        PathBuf::from(
            self.matrix_template
                .replace(LABEL_SET_PLACEHOLDER, label_set),
        )
    }

    pub fn results_path(&self, family: ClassifierFamily) -> PathBuf {
        self.output_dir
            .join(self.output_template.replace(FAMILY_PLACEHOLDER, family.id()))
    }

    pub fn summary_path(&self, family: ClassifierFamily) -> PathBuf {
        self.output_dir
            .join(format!("summary_{}.json", family.id()))
    }
}

fn check_unique<'a>(
    what: &str,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), ConfigError> {
    let mut seen = BTreeSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(ConfigError::Invalid(format!("empty {what} name")));
        }
        if !seen.insert(name) {
            return Err(ConfigError::Invalid(format!("duplicate {what} `{name}`")));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/config.rs"]
mod tests;
