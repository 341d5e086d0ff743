use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use crate::action_plans::requests::{
    CreateActionPlanRequest, LinkReviewRequest, UpdateActionPlanRequest,
};
use crate::action_plans::responses::{
    ActionPlanDetailResponse, ActionPlanResponse, ListActionPlansResponse, ProgressResponse,
};
use crate::error::ApiError;
use crate::extractors::UserLogin;
use crate::AppState;

pub async fn list_open_action_plans(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<ListActionPlansResponse>, ApiError> {
    let plans = state
        .action_plan_service()
        .open_by_project(project_id)
        .await?;
    let data: Vec<_> = plans.iter().map(|p| p.to_hash()).collect();
    let count = data.len();
    Ok(Json(ListActionPlansResponse { data, count }))
}

pub async fn create_action_plan(
    State(state): State<AppState>,
    UserLogin(login): UserLogin,
    Json(body): Json<CreateActionPlanRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let form = body.into_form(&login);
    let plan = state.action_plan_service().create(&login, form).await?;
    Ok((StatusCode::CREATED, Json(ActionPlanResponse::from(&plan))))
}

pub async fn get_action_plan(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ActionPlanDetailResponse>, ApiError> {
    let service = state.action_plan_service();
    let plan = service.find_by_key(&key).await?;
    let owner = service.owner(&plan).await?;
    Ok(Json(ActionPlanDetailResponse {
        data: plan.to_hash(),
        over_due: plan.is_over_due(),
        owner,
    }))
}

pub async fn update_action_plan(
    State(state): State<AppState>,
    UserLogin(login): UserLogin,
    Path(key): Path<String>,
    Json(body): Json<UpdateActionPlanRequest>,
) -> Result<Json<ActionPlanResponse>, ApiError> {
    let plan = state
        .action_plan_service()
        .update(&key, &login, |form| body.apply_to(form))
        .await?;
    Ok(Json(ActionPlanResponse::from(&plan)))
}

pub async fn close_action_plan(
    State(state): State<AppState>,
    UserLogin(login): UserLogin,
    Path(key): Path<String>,
) -> Result<Json<ActionPlanResponse>, ApiError> {
    let plan = state.action_plan_service().close(&key, &login).await?;
    Ok(Json(ActionPlanResponse::from(&plan)))
}

pub async fn reopen_action_plan(
    State(state): State<AppState>,
    UserLogin(login): UserLogin,
    Path(key): Path<String>,
) -> Result<Json<ActionPlanResponse>, ApiError> {
    let plan = state.action_plan_service().reopen(&key, &login).await?;
    Ok(Json(ActionPlanResponse::from(&plan)))
}

pub async fn link_review(
    State(state): State<AppState>,
    UserLogin(_login): UserLogin,
    Path(key): Path<String>,
    Json(body): Json<LinkReviewRequest>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let data = state
        .action_plan_service()
        .link_review(&key, body.review_id)
        .await?;
    Ok(Json(ProgressResponse { key, data }))
}

pub async fn get_progress(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let data = state.action_plan_service().progress(&key).await?;
    Ok(Json(ProgressResponse { key, data }))
}
