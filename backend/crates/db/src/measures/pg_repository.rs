use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use qualis_common::error::{QualisError, QualisResult};
use qualis_measures::{
    Component, Measure, MeasureEnhanced, MeasurePeriod, MeasuresFetcher, MeasuresPayload, Metric,
    Metrics, Period,
};

#[derive(Clone)]
pub struct PgMeasuresRepository {
    pool: PgPool,
}

impl PgMeasuresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn upsert_metric(&self, metric: &Metric) -> QualisResult<()> {
        sqlx::query(
            "insert into metrics (key, name, domain, value_type, description, hidden)
             values ($1, $2, $3, $4, $5, $6)
             on conflict (key) do update set
               name = excluded.name,
               domain = excluded.domain,
               value_type = excluded.value_type,
               description = excluded.description,
               hidden = excluded.hidden",
        )
        .bind(&metric.key)
        .bind(&metric.name)
        .bind(&metric.domain)
        .bind(&metric.value_type)
        .bind(&metric.description)
        .bind(metric.hidden)
        .execute(&self.pool)
        .await
        .map_err(|e| QualisError::Database(e.to_string()))?;
        Ok(())
    }

    pub async fn upsert_component(&self, component: &Component) -> QualisResult<()> {
        sqlx::query(
            "insert into components (kee, name, qualifier)
             values ($1, $2, $3)
             on conflict (kee) do update set name = excluded.name, qualifier = excluded.qualifier",
        )
        .bind(&component.key)
        .bind(&component.name)
        .bind(&component.qualifier)
        .execute(&self.pool)
        .await
        .map_err(|e| QualisError::Database(e.to_string()))?;
        Ok(())
    }

    pub async fn upsert_measure(&self, component_key: &str, measure: &Measure) -> QualisResult<()> {
        sqlx::query(
            "insert into measures (component_kee, metric_key, value, periods)
             values ($1, $2, $3, $4)
             on conflict (component_kee, metric_key) do update set
               value = excluded.value,
               periods = excluded.periods",
        )
        .bind(component_key)
        .bind(&measure.metric)
        .bind(&measure.value)
        .bind(measure.periods.as_ref().map(Json))
        .execute(&self.pool)
        .await
        .map_err(|e| QualisError::Database(e.to_string()))?;
        Ok(())
    }

    pub async fn upsert_period(&self, component_key: &str, period: &Period) -> QualisResult<()> {
        sqlx::query(
            "insert into component_periods (component_kee, period_index, mode, period_date, parameter)
             values ($1, $2, $3, $4, $5)
             on conflict (component_kee, period_index) do update set
               mode = excluded.mode,
               period_date = excluded.period_date,
               parameter = excluded.parameter",
        )
        .bind(component_key)
        .bind(period.index)
        .bind(&period.mode)
        .bind(period.date)
        .bind(&period.parameter)
        .execute(&self.pool)
        .await
        .map_err(|e| QualisError::Database(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl MeasuresFetcher for PgMeasuresRepository {
    async fn fetch_component(&self, key: &str) -> QualisResult<Option<Component>> {
        let row = sqlx::query("select kee, name, qualifier from components where kee = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| QualisError::Database(e.to_string()))?;

        Ok(row.map(|r| Component {
            key: r.get("kee"),
            name: r.get("name"),
            qualifier: r.get("qualifier"),
        }))
    }

    async fn fetch_metrics(&self) -> QualisResult<Metrics> {
        let rows = sqlx::query(
            "select key, name, domain, value_type, description, hidden
             from metrics
             where hidden = false",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| QualisError::Database(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|r| {
                let metric = Metric {
                    key: r.get("key"),
                    name: r.get("name"),
                    domain: r.get("domain"),
                    value_type: r.get("value_type"),
                    description: r.get("description"),
                    hidden: r.get("hidden"),
                };
                (metric.key.clone(), metric)
            })
            .collect())
    }

    async fn fetch_measures(
        &self,
        component: &Component,
        metrics: &Metrics,
    ) -> QualisResult<MeasuresPayload> {
        let metric_keys: Vec<String> = metrics.keys().cloned().collect();

        let rows = sqlx::query(
            "select metric_key, value, periods
             from measures
             where component_kee = $1 and metric_key = any($2)",
        )
        .bind(&component.key)
        .bind(&metric_keys)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| QualisError::Database(e.to_string()))?;

        let measures: Vec<Measure> = rows
            .iter()
            .map(|r| {
                let periods: Option<Json<Vec<MeasurePeriod>>> = r.get("periods");
                Measure {
                    metric: r.get("metric_key"),
                    value: r.get("value"),
                    periods: periods.map(|Json(p)| p),
                }
            })
            .collect();

        let period_rows = sqlx::query(
            "select period_index, mode, period_date, parameter
             from component_periods
             where component_kee = $1
             order by period_index",
        )
        .bind(&component.key)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| QualisError::Database(e.to_string()))?;

        let periods = period_rows
            .iter()
            .map(|r| Period {
                index: r.get("period_index"),
                mode: r.get("mode"),
                date: r.get("period_date"),
                parameter: r.get("parameter"),
            })
            .collect();

        tracing::debug!(
            component = %component.key,
            measures = measures.len(),
            "loaded component measures"
        );

        Ok(MeasuresPayload {
            measures: MeasureEnhanced::enhance_all(measures, metrics),
            periods,
        })
    }
}
