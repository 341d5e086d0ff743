use chrono::{DateTime, Utc};
use qualis_db::action_plans::validation::ActionPlanForm;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateActionPlanRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub project_id: Option<Uuid>,
    pub user_login: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
}

impl CreateActionPlanRequest {
    /// New plans start open and belong to the acting user unless another
    /// owner is given.
    pub fn into_form(self, acting_login: &str) -> ActionPlanForm {
        ActionPlanForm {
            name: self.name,
            description: self.description,
            status: Some("OPEN".to_string()),
            project_id: self.project_id,
            user_login: Some(
                self.user_login
                    .unwrap_or_else(|| acting_login.to_string()),
            ),
            deadline: self.deadline,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateActionPlanRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub user_login: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub clear_deadline: bool,
}

impl UpdateActionPlanRequest {
    pub fn apply_to(self, form: &mut ActionPlanForm) {
        if let Some(name) = self.name {
            form.name = name;
        }
        if let Some(description) = self.description {
            form.description = Some(description);
        }
        if let Some(login) = self.user_login {
            form.user_login = Some(login);
        }
        if self.clear_deadline {
            form.deadline = None;
        } else if self.deadline.is_some() {
            form.deadline = self.deadline;
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LinkReviewRequest {
    pub review_id: Uuid,
}
