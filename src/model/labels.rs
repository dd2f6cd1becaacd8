use std::collections::BTreeMap;

/// Maps categorical labels to dense class ids in sorted label order.
#[derive(Debug, Clone, Default)]
pub struct LabelEncoder {
    classes: Vec<String>,
    index: BTreeMap<String, usize>,
}

impl LabelEncoder {
    pub fn fit<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let mut index = BTreeMap::new();
        for label in labels {
            index.entry(label.to_string()).or_insert(0usize);
        }
        let mut classes = Vec::with_capacity(index.len());
        for (id, (label, slot)) in index.iter_mut().enumerate() {
            *slot = id;
            classes.push(label.clone());
        }
        Self { classes, index }
    }

    pub fn encode(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    pub fn decode(&self, class_id: usize) -> Option<&str> {
        self.classes.get(class_id).map(String::as_str)
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }
}
