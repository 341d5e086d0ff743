use std::collections::HashMap;

use async_trait::async_trait;
use qualis_common::error::QualisResult;
use qualis_measures::{
    Component, Measure, MeasureEnhanced, MeasuresFetcher, MeasuresPayload, Metric, Metrics, Period,
};
use tokio::sync::Mutex;

#[derive(Default)]
struct Tables {
    metrics: Metrics,
    components: HashMap<String, Component>,
    measures: HashMap<String, Vec<Measure>>,
    periods: HashMap<String, Vec<Period>>,
}

/// Process-local measures source, handy for tests and local runs.
#[derive(Default)]
pub struct InMemoryMeasuresRepository {
    tables: Mutex<Tables>,
}

impl InMemoryMeasuresRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_metric(&self, metric: Metric) {
        self.tables
            .lock()
            .await
            .metrics
            .insert(metric.key.clone(), metric);
    }

    pub async fn add_component(&self, component: Component) {
        self.tables
            .lock()
            .await
            .components
            .insert(component.key.clone(), component);
    }

    pub async fn add_measure(&self, component_key: &str, measure: Measure) {
        self.tables
            .lock()
            .await
            .measures
            .entry(component_key.to_string())
            .or_default()
            .push(measure);
    }

    pub async fn add_period(&self, component_key: &str, period: Period) {
        self.tables
            .lock()
            .await
            .periods
            .entry(component_key.to_string())
            .or_default()
            .push(period);
    }
}

#[async_trait]
impl MeasuresFetcher for InMemoryMeasuresRepository {
    async fn fetch_component(&self, key: &str) -> QualisResult<Option<Component>> {
        Ok(self.tables.lock().await.components.get(key).cloned())
    }

    async fn fetch_metrics(&self) -> QualisResult<Metrics> {
        let tables = self.tables.lock().await;
        Ok(tables
            .metrics
            .iter()
            .filter(|(_, m)| !m.hidden)
            .map(|(k, m)| (k.clone(), m.clone()))
            .collect())
    }

    async fn fetch_measures(
        &self,
        component: &Component,
        metrics: &Metrics,
    ) -> QualisResult<MeasuresPayload> {
        let tables = self.tables.lock().await;
        let measures = tables
            .measures
            .get(&component.key)
            .cloned()
            .unwrap_or_default();
        let mut periods = tables
            .periods
            .get(&component.key)
            .cloned()
            .unwrap_or_default();
        periods.sort_by_key(|p| p.index);

        Ok(MeasuresPayload {
            measures: MeasureEnhanced::enhance_all(measures, metrics),
            periods,
        })
    }
}
