use std::sync::Arc;

use async_trait::async_trait;
use qualis_common::error::QualisResult;
use serde::{Deserialize, Serialize};

use crate::l10n::Messages;
use crate::layout::{Layout, PageLayout};
use crate::models::{Component, MeasureEnhanced, Metrics, Period};
use crate::query::{parse_query, Query, RawQuery};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasuresPayload {
    pub measures: Vec<MeasureEnhanced>,
    pub periods: Vec<Period>,
}

/// Data source behind the measures view.
#[async_trait]
pub trait MeasuresFetcher: Send + Sync {
    async fn fetch_component(&self, key: &str) -> QualisResult<Option<Component>>;

    /// Current metric definitions.
    async fn fetch_metrics(&self) -> QualisResult<Metrics>;

    async fn fetch_measures(
        &self,
        component: &Component,
        metrics: &Metrics,
    ) -> QualisResult<MeasuresPayload>;
}

/// Inputs of the view, replaced wholesale on every update.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewProps {
    pub component: Component,
    pub metrics: Metrics,
    pub query: RawQuery,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub loading: bool,
    pub measures: Vec<MeasureEnhanced>,
    pub periods: Vec<Period>,
    pub query: Query,
    pub error: Option<String>,
}

/// Identifies one measures fetch. Only the latest ticket may update the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

pub struct MeasuresView<F: MeasuresFetcher + ?Sized> {
    fetcher: Arc<F>,
    props: ViewProps,
    state: ViewState,
    mounted: bool,
    generation: u64,
}

impl<F: MeasuresFetcher + ?Sized> MeasuresView<F> {
    pub fn new(fetcher: Arc<F>, props: ViewProps) -> Self {
        let query = parse_query(&props.query);
        Self {
            fetcher,
            props,
            state: ViewState {
                loading: true,
                measures: Vec::new(),
                periods: Vec::new(),
                query,
                error: None,
            },
            mounted: false,
            generation: 0,
        }
    }

    pub fn props(&self) -> &ViewProps {
        &self.props
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Refresh metric definitions, then load the component's measures.
    pub async fn mount(&mut self) {
        self.mounted = true;

        match self.fetcher.fetch_metrics().await {
            Ok(metrics) => {
                if metrics != self.props.metrics {
                    tracing::debug!(count = metrics.len(), "metric definitions refreshed");
                    self.props.metrics = metrics;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "metric definitions refresh failed, keeping current set");
            }
        }

        self.fetch_measures().await;
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    pub async fn receive_props(&mut self, next: ViewProps) {
        if next.query != self.props.query {
            self.state.query = parse_query(&next.query);
        }

        let refetch =
            next.component.key != self.props.component.key || next.metrics != self.props.metrics;
        self.props = next;

        if refetch {
            self.fetch_measures().await;
        }
    }

    pub async fn fetch_measures(&mut self) {
        let ticket = self.begin_fetch();
        let result = self
            .fetcher
            .fetch_measures(&self.props.component, &self.props.metrics)
            .await;
        self.complete_fetch(ticket, result);
    }

    /// Mark the view as loading and hand out the ticket of the new fetch.
    /// Any ticket issued earlier becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.state.loading = true;
        FetchTicket {
            generation: self.generation,
        }
    }

    /// Apply the outcome of a fetch. Returns whether the state changed.
    ///
    /// Outcomes are dropped once the view is unmounted or when a newer fetch
    /// was started. A failure clears the loading flag and keeps the previous
    /// measures.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: QualisResult<MeasuresPayload>,
    ) -> bool {
        if !self.mounted {
            return false;
        }
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                latest = self.generation,
                "dropping stale measures fetch"
            );
            return false;
        }

        self.state.loading = false;
        match result {
            Ok(payload) => {
                self.state.measures = payload.measures;
                self.state.periods = payload.periods;
                self.state.error = None;
            }
            Err(e) => {
                tracing::warn!(
                    component = %self.props.component.key,
                    error = %e,
                    "measures fetch failed"
                );
                self.state.error = Some(e.to_string());
            }
        }
        true
    }

    pub fn render(&self, messages: &Messages) -> Layout {
        if self.state.loading {
            return Layout::Spinner;
        }
        Layout::Page(PageLayout::new(
            &self.state.measures,
            &self.state.query,
            messages,
        ))
    }
}
