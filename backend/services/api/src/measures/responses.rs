use qualis_measures::{Layout, Period, RawQuery};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MeasuresPageResponse {
    pub component: String,
    /// Canonical form of the request query, default values left out.
    pub query: RawQuery,
    pub periods: Vec<Period>,
    pub layout: Layout,
}
