use serde::Serialize;

use crate::domains::{group_by_domains, DomainGroup};
use crate::l10n::Messages;
use crate::models::MeasureEnhanced;
use crate::query::Query;

pub const PAGE_ID: &str = "component-measures";
pub const TITLE_KEY: &str = "layout.measures";

/// What the measures page shows for a given view state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layout {
    Spinner,
    Page(PageLayout),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageLayout {
    pub id: String,
    pub title: String,
    pub sidebar: Sidebar,
    pub header: String,
    pub main: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sidebar {
    pub query: Query,
    pub domains: Vec<SidebarDomain>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SidebarDomain {
    pub name: String,
    pub label: String,
    pub selected: bool,
    pub measures: Vec<SidebarMeasure>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SidebarMeasure {
    pub metric: String,
    pub label: String,
    pub value: Option<String>,
    pub leak: Option<String>,
    pub selected: bool,
}

impl Sidebar {
    pub fn build(measures: &[MeasureEnhanced], query: &Query, messages: &Messages) -> Self {
        let domains = group_by_domains(measures, messages)
            .into_iter()
            .map(|group| sidebar_domain(group, query, messages))
            .collect();

        Self {
            query: query.clone(),
            domains,
        }
    }
}

fn sidebar_domain(group: DomainGroup, query: &Query, messages: &Messages) -> SidebarDomain {
    let label = messages.localized_domain_name(&group.name);
    let selected = query.domain.as_deref() == Some(group.name.as_str());
    let measures = group
        .measures
        .into_iter()
        .map(|m| SidebarMeasure {
            label: messages.localized_metric_name(&m.metric),
            selected: query.metric.as_deref() == Some(m.metric.key.as_str()),
            metric: m.metric.key,
            value: m.value,
            leak: m.leak,
        })
        .collect();

    SidebarDomain {
        name: group.name,
        label,
        selected,
        measures,
    }
}

impl PageLayout {
    pub fn new(measures: &[MeasureEnhanced], query: &Query, messages: &Messages) -> Self {
        Self {
            id: PAGE_ID.to_string(),
            title: messages.translate(TITLE_KEY),
            sidebar: Sidebar::build(measures, query, messages),
            header: "Header".to_string(),
            main: "Main".to_string(),
        }
    }
}
