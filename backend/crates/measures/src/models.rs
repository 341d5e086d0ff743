use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::leak::get_leak_value;

/// Metric definitions keyed by metric key.
pub type Metrics = BTreeMap<String, Metric>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub key: String,
    pub name: String,
    pub domain: Option<String>,
    #[serde(rename = "type")]
    pub value_type: String,
    pub description: Option<String>,
    #[serde(default)]
    pub hidden: bool,
}

/// Value of a measure on one comparison period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurePeriod {
    pub index: i32,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub metric: String,
    pub value: Option<String>,
    pub periods: Option<Vec<MeasurePeriod>>,
}

/// A measure joined with its metric definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureEnhanced {
    pub metric: Metric,
    pub value: Option<String>,
    pub periods: Option<Vec<MeasurePeriod>>,
    pub leak: Option<String>,
}

impl MeasureEnhanced {
    pub fn new(measure: Measure, metric: Metric) -> Self {
        let leak = get_leak_value(Some(&measure), None);
        Self {
            metric,
            value: measure.value,
            periods: measure.periods,
            leak,
        }
    }

    /// Join raw measures with their definitions, dropping measures whose
    /// metric is unknown.
    pub fn enhance_all(measures: Vec<Measure>, metrics: &Metrics) -> Vec<Self> {
        measures
            .into_iter()
            .filter_map(|m| {
                let metric = metrics.get(&m.metric)?.clone();
                Some(Self::new(m, metric))
            })
            .collect()
    }

    pub fn domain(&self) -> Option<&str> {
        self.metric.domain.as_deref()
    }
}

/// Comparison period configured on a component ("since previous version", ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub index: i32,
    pub mode: String,
    pub date: Option<DateTime<Utc>>,
    pub parameter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub key: String,
    pub name: String,
    pub qualifier: String,
}
