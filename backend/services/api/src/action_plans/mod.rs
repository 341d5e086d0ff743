pub mod handlers;
pub mod requests;
pub mod responses;
pub mod service;

use axum::routing::{get, post};
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/projects/{project_id}/action-plans",
            get(handlers::list_open_action_plans),
        )
        .route("/action-plans", post(handlers::create_action_plan))
        .route(
            "/action-plans/{key}",
            get(handlers::get_action_plan).put(handlers::update_action_plan),
        )
        .route("/action-plans/{key}/close", post(handlers::close_action_plan))
        .route("/action-plans/{key}/reopen", post(handlers::reopen_action_plan))
        .route("/action-plans/{key}/reviews", post(handlers::link_review))
        .route("/action-plans/{key}/progress", get(handlers::get_progress))
}
