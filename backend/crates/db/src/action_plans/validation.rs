use chrono::{DateTime, Utc};
use qualis_common::error::{QualisError, QualisResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::action_plans::models::{ActionPlan, ActionPlanStatus};
use crate::action_plans::repositories::ActionPlanRepository;

pub const NAME_MIN_LENGTH: usize = 1;
pub const NAME_MAX_LENGTH: usize = 200;
pub const DESCRIPTION_MAX_LENGTH: usize = 1000;

pub const CANT_BE_EMPTY: &str = "can't be empty";
pub const NOT_INCLUDED: &str = "is not included in the list";
pub const SAME_NAME_IN_SAME_PROJECT: &str =
    "An action plan with the same name already exists on this project";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Base,
    Name,
    Description,
    UserLogin,
    Status,
    Project,
}

impl Field {
    /// Prefix used in full messages. `Base` errors stand alone.
    fn human_name(&self) -> Option<&'static str> {
        match self {
            Self::Base => None,
            Self::Name => Some("Name"),
            Self::Description => Some("Description"),
            Self::UserLogin => Some("User login"),
            Self::Status => Some("Status"),
            Self::Project => Some("Project"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    pub fn full_message(&self) -> String {
        match self.field.human_name() {
            Some(name) => format!("{name} {}", self.message),
            None => self.message.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn on(&self, field: Field) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    pub fn full_messages(&self) -> Vec<String> {
        self.errors.iter().map(FieldError::full_message).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }
}

impl From<ValidationErrors> for QualisError {
    fn from(errors: ValidationErrors) -> Self {
        QualisError::Validation(errors.full_messages().join(", "))
    }
}

/// Submitted attributes of an action plan, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionPlanForm {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub project_id: Option<Uuid>,
    pub user_login: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
}

/// A form that passed validation, with typed required fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedForm {
    pub name: String,
    pub description: Option<String>,
    pub status: ActionPlanStatus,
    pub project_id: Uuid,
    pub user_login: String,
    pub deadline: Option<DateTime<Utc>>,
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

impl ActionPlanForm {
    pub fn from_plan(plan: &ActionPlan) -> Self {
        Self {
            name: plan.name.clone(),
            description: plan.description.clone(),
            status: Some(plan.status.as_str().to_string()),
            project_id: Some(plan.project_id),
            user_login: Some(plan.user_login.clone()),
            deadline: plan.deadline,
        }
    }

    /// Field-level rules. Uniqueness needs the store, see [`check_unique_name`].
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::default();

        let name_len = self.name.chars().count();
        if name_len < NAME_MIN_LENGTH {
            errors.add(
                Field::Name,
                format!("is too short (minimum is {NAME_MIN_LENGTH} character)"),
            );
        } else if name_len > NAME_MAX_LENGTH {
            errors.add(
                Field::Name,
                format!("is too long (maximum is {NAME_MAX_LENGTH} characters)"),
            );
        }

        if let Some(desc) = &self.description {
            if desc.chars().count() > DESCRIPTION_MAX_LENGTH {
                errors.add(
                    Field::Description,
                    format!("is too long (maximum is {DESCRIPTION_MAX_LENGTH} characters)"),
                );
            }
        }

        if is_blank(self.user_login.as_deref()) {
            errors.add(Field::UserLogin, CANT_BE_EMPTY);
        }

        if is_blank(self.status.as_deref()) {
            errors.add(Field::Status, CANT_BE_EMPTY);
        } else if self.parsed_status().is_none() {
            errors.add(Field::Status, NOT_INCLUDED);
        }

        if self.project_id.is_none() {
            errors.add(Field::Project, CANT_BE_EMPTY);
        }

        errors
    }

    pub fn parsed_status(&self) -> Option<ActionPlanStatus> {
        self.status.as_deref()?.trim().parse().ok()
    }

    /// Turn the form into typed fields when `errors`, the outcome of
    /// [`validate`](Self::validate) plus any store checks, is empty.
    pub fn check(self, errors: ValidationErrors) -> Result<CheckedForm, ValidationErrors> {
        if !errors.is_empty() {
            return Err(errors);
        }

        let (Some(status), Some(project_id), Some(user_login)) =
            (self.parsed_status(), self.project_id, self.user_login.clone())
        else {
            return Err(self.validate());
        };

        Ok(CheckedForm {
            name: self.name,
            description: self.description.filter(|d| !d.trim().is_empty()),
            status,
            project_id,
            user_login: user_login.trim().to_string(),
            deadline: self.deadline,
        })
    }
}

/// Reject `name` when another plan of the same project already uses it.
///
/// `current_id` is the plan being updated, `None` for a new one. The lookup
/// and the later write are not atomic.
pub async fn check_unique_name<R: ActionPlanRepository + ?Sized>(
    repo: &R,
    project_id: Uuid,
    name: &str,
    current_id: Option<Uuid>,
    errors: &mut ValidationErrors,
) -> QualisResult<()> {
    if let Some(existing) = repo.find_by_project_and_name(project_id, name).await? {
        if Some(existing.id) != current_id {
            errors.add(Field::Base, SAME_NAME_IN_SAME_PROJECT);
        }
    }
    Ok(())
}
