use std::collections::HashMap;

use crate::models::Metric;

/// Translation bundle. Lookups fall back to the key itself.
#[derive(Debug, Clone, Default)]
pub struct Messages {
    entries: HashMap<String, String>,
}

impl Messages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bundle with the labels the measures page needs out of the box.
    pub fn english() -> Self {
        Self::from_pairs([
            ("layout.measures", "Measures"),
            ("metric_domain.Releasability", "Releasability"),
            ("metric_domain.Reliability", "Reliability"),
            ("metric_domain.Security", "Security"),
            ("metric_domain.Maintainability", "Maintainability"),
            ("metric_domain.Coverage", "Coverage"),
            ("metric_domain.Duplications", "Duplications"),
            ("metric_domain.Size", "Size"),
            ("metric_domain.Complexity", "Complexity"),
        ])
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn translate(&self, key: &str) -> String {
        self.get(key).unwrap_or(key).to_string()
    }

    /// `metric.<key>.name` from the bundle, else the metric's own name.
    pub fn localized_metric_name(&self, metric: &Metric) -> String {
        self.get(&format!("metric.{}.name", metric.key))
            .unwrap_or(&metric.name)
            .to_string()
    }

    /// `metric_domain.<domain>` from the bundle, else the domain itself.
    pub fn localized_domain_name(&self, domain: &str) -> String {
        self.get(&format!("metric_domain.{domain}"))
            .unwrap_or(domain)
            .to_string()
    }
}
