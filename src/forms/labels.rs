//! Display labels for expense category codes.

use std::collections::HashMap;

const DEFAULT_FALLBACK: &str = "Other Business Expenses";

const DEFAULT_LABELS: [(&str, &str); 8] = [
    ("meals", "Meals and Entertainment"),
    ("travel", "Travel"),
    ("software", "Software and Subscriptions"),
    ("home_office", "Home Office"),
    ("equipment", "Equipment"),
    ("supplies", "Office Supplies"),
    ("professional_services", "Professional Services"),
    ("advertising", "Advertising and Marketing"),
];

/// Mapping from raw category code to the label printed on a form.
///
/// Codes without an entry print the fallback label.
#[derive(Debug, Clone)]
pub struct CategoryLabels {
    labels: HashMap<String, String>,
    fallback: String,
}

impl CategoryLabels {
    /// An empty mapping; every code prints as `fallback`.
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            labels: HashMap::new(),
            fallback: fallback.into(),
        }
    }

    pub fn with_label(mut self, code: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(code.into(), label.into());
        self
    }

    pub fn label_for(&self, code: &str) -> &str {
        self.labels
            .get(code)
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }
}

impl Default for CategoryLabels {
    fn default() -> Self {
        DEFAULT_LABELS
            .iter()
            .fold(Self::new(DEFAULT_FALLBACK), |labels, (code, label)| {
                labels.with_label(*code, *label)
            })
    }
}
