use qualis_db::action_plans::models::{ActionPlan, ActionPlanHash, Progress, User};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ActionPlanResponse {
    pub data: ActionPlanHash,
    pub over_due: bool,
}

impl From<&ActionPlan> for ActionPlanResponse {
    fn from(plan: &ActionPlan) -> Self {
        Self {
            data: plan.to_hash(),
            over_due: plan.is_over_due(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ActionPlanDetailResponse {
    pub data: ActionPlanHash,
    pub over_due: bool,
    pub owner: Option<User>,
}

#[derive(Debug, Serialize)]
pub struct ListActionPlansResponse {
    pub data: Vec<ActionPlanHash>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub key: String,
    pub data: Progress,
}
