use async_trait::async_trait;
use uuid::Uuid;

use crate::action_plans::models::{ActionPlan, Project, Review, User};
use qualis_common::error::QualisResult;

#[async_trait]
pub trait ActionPlanRepository: Send + Sync {
    async fn find_by_key(&self, key: &str) -> QualisResult<Option<ActionPlan>>;

    async fn find_by_project_and_name(
        &self,
        project_id: Uuid,
        name: &str,
    ) -> QualisResult<Option<ActionPlan>>;

    /// Open plans of a project, ordered by name.
    async fn open_by_project(&self, project_id: Uuid) -> QualisResult<Vec<ActionPlan>>;

    async fn create(&self, plan: ActionPlan) -> QualisResult<ActionPlan>;
    async fn update(&self, plan: ActionPlan) -> QualisResult<ActionPlan>;

    /// Attach a review to a plan. Linking twice is a no-op.
    async fn link_review(&self, plan_id: Uuid, review_id: Uuid) -> QualisResult<()>;
    async fn list_reviews(&self, plan_id: Uuid) -> QualisResult<Vec<Review>>;
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn get_review(&self, id: Uuid) -> QualisResult<Option<Review>>;
    async fn create_review(&self, review: Review) -> QualisResult<Review>;
}

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn get_project(&self, id: Uuid) -> QualisResult<Option<Project>>;
    async fn create_project(&self, project: Project) -> QualisResult<Project>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_user_by_login(&self, login: &str) -> QualisResult<Option<User>>;
    async fn create_user(&self, user: User) -> QualisResult<User>;
}

/// Everything the action plan workflows read and write.
pub trait ActionPlanStore:
    ActionPlanRepository + ReviewRepository + ProjectRepository + UserRepository
{
}

impl<T> ActionPlanStore for T where
    T: ActionPlanRepository + ReviewRepository + ProjectRepository + UserRepository
{
}
