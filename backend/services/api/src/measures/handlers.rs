use axum::extract::{Path, Query, State};
use axum::Json;
use qualis_common::error::QualisError;
use qualis_measures::{serialize_query, MeasuresFetcher, MeasuresView, RawQuery, ViewProps};

use crate::error::ApiError;
use crate::measures::responses::MeasuresPageResponse;
use crate::AppState;

pub async fn get_component_measures(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(raw): Query<RawQuery>,
) -> Result<Json<MeasuresPageResponse>, ApiError> {
    let component = state
        .measures
        .fetch_component(&key)
        .await?
        .ok_or_else(|| QualisError::NotFound(format!("component not found: {key}")))?;
    let metrics = state.measures.fetch_metrics().await?;

    let mut view = MeasuresView::new(
        state.measures.clone(),
        ViewProps {
            component,
            metrics,
            query: raw,
        },
    );
    view.mount().await;

    if let Some(error) = &view.state().error {
        return Err(QualisError::Internal(error.clone()).into());
    }

    let response = MeasuresPageResponse {
        component: view.props().component.key.clone(),
        query: serialize_query(&view.state().query),
        periods: view.state().periods.clone(),
        layout: view.render(&state.messages),
    };
    view.unmount();

    Ok(Json(response))
}
