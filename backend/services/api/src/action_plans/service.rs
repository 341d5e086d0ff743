use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use qualis_common::error::{QualisError, QualisResult};
use qualis_db::action_plans::models::{ActionPlan, ActionPlanStatus, Progress, User};
use qualis_db::action_plans::repositories::{
    ActionPlanRepository, ActionPlanStore, ProjectRepository, ReviewRepository, UserRepository,
};
use qualis_db::action_plans::validation::{
    check_unique_name, ActionPlanForm, Field, ValidationErrors,
};

pub const PROJECT_DOES_NOT_EXIST: &str = "does not exist";

/// Action plan workflows on top of a store.
pub struct ActionPlanService<S: ActionPlanStore + ?Sized> {
    store: Arc<S>,
}

impl<S: ActionPlanStore + ?Sized> ActionPlanService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn find_by_key(&self, key: &str) -> QualisResult<ActionPlan> {
        self.store
            .find_by_key(key)
            .await?
            .ok_or_else(|| QualisError::NotFound(format!("action plan not found: {key}")))
    }

    pub async fn open_by_project(&self, project_id: Uuid) -> QualisResult<Vec<ActionPlan>> {
        if self.store.get_project(project_id).await?.is_none() {
            return Err(QualisError::NotFound(format!(
                "project not found: {project_id}"
            )));
        }
        self.store.open_by_project(project_id).await
    }

    pub async fn owner(&self, plan: &ActionPlan) -> QualisResult<Option<User>> {
        self.store.get_user_by_login(&plan.user_login).await
    }

    pub async fn create(
        &self,
        acting_login: &str,
        form: ActionPlanForm,
    ) -> QualisResult<ActionPlan> {
        let errors = self.collect_errors(&form, None).await?;
        let checked = form.check(errors)?;

        let now = Utc::now();
        let plan = ActionPlan {
            id: Uuid::new_v4(),
            key: Uuid::new_v4().to_string(),
            name: checked.name,
            description: checked.description,
            status: checked.status,
            project_id: checked.project_id,
            user_login: checked.user_login,
            deadline: checked.deadline,
            created_at: Some(now),
            updated_at: Some(now),
        };

        let plan = self.store.create(plan).await?;
        tracing::info!(
            key = %plan.key,
            project_id = %plan.project_id,
            by = acting_login,
            "action plan created"
        );
        Ok(plan)
    }

    /// Validate `edit(form)` applied to the stored plan and save the result.
    pub async fn update<E>(
        &self,
        key: &str,
        acting_login: &str,
        edit: E,
    ) -> QualisResult<ActionPlan>
    where
        E: FnOnce(&mut ActionPlanForm) + Send,
    {
        let current = self.find_by_key(key).await?;
        let mut form = ActionPlanForm::from_plan(&current);
        edit(&mut form);

        let errors = self.collect_errors(&form, Some(current.id)).await?;
        let checked = form.check(errors)?;

        let plan = ActionPlan {
            name: checked.name,
            description: checked.description,
            status: checked.status,
            project_id: checked.project_id,
            user_login: checked.user_login,
            deadline: checked.deadline,
            updated_at: Some(Utc::now()),
            ..current
        };

        let plan = self.store.update(plan).await?;
        tracing::info!(key = %plan.key, by = acting_login, "action plan updated");
        Ok(plan)
    }

    pub async fn close(&self, key: &str, acting_login: &str) -> QualisResult<ActionPlan> {
        self.set_status(key, acting_login, ActionPlanStatus::Closed)
            .await
    }

    pub async fn reopen(&self, key: &str, acting_login: &str) -> QualisResult<ActionPlan> {
        self.set_status(key, acting_login, ActionPlanStatus::Open)
            .await
    }

    pub async fn link_review(&self, key: &str, review_id: Uuid) -> QualisResult<Progress> {
        let plan = self.find_by_key(key).await?;
        let review = self
            .store
            .get_review(review_id)
            .await?
            .ok_or_else(|| QualisError::NotFound(format!("review not found: {review_id}")))?;

        if review.project_id != plan.project_id {
            return Err(QualisError::Validation(format!(
                "review {review_id} does not belong to the project of action plan {key}"
            )));
        }

        self.store.link_review(plan.id, review.id).await?;
        tracing::debug!(key = %plan.key, review = %review.id, "review linked");

        let reviews = self.store.list_reviews(plan.id).await?;
        Ok(plan.progress(&reviews))
    }

    pub async fn progress(&self, key: &str) -> QualisResult<Progress> {
        let plan = self.find_by_key(key).await?;
        let reviews = self.store.list_reviews(plan.id).await?;
        Ok(plan.progress(&reviews))
    }

    async fn set_status(
        &self,
        key: &str,
        acting_login: &str,
        status: ActionPlanStatus,
    ) -> QualisResult<ActionPlan> {
        let current = self.find_by_key(key).await?;
        if current.status == status {
            return Ok(current);
        }

        let plan = ActionPlan {
            status,
            updated_at: Some(Utc::now()),
            ..current
        };
        let plan = self.store.update(plan).await?;
        tracing::info!(
            key = %plan.key,
            status = plan.status.as_str(),
            by = acting_login,
            "action plan status changed"
        );
        Ok(plan)
    }

    async fn collect_errors(
        &self,
        form: &ActionPlanForm,
        current_id: Option<Uuid>,
    ) -> QualisResult<ValidationErrors> {
        let mut errors = form.validate();

        if let Some(project_id) = form.project_id {
            if self.store.get_project(project_id).await?.is_none() {
                errors.add(Field::Project, PROJECT_DOES_NOT_EXIST);
            }
            check_unique_name(
                self.store.as_ref(),
                project_id,
                &form.name,
                current_id,
                &mut errors,
            )
            .await?;
        }

        Ok(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qualis_db::action_plans::memory_repository::InMemoryActionPlanRepository;
    use qualis_db::action_plans::models::{Project, Review, ReviewStatus};
    use qualis_db::action_plans::validation::SAME_NAME_IN_SAME_PROJECT;

    type Service = ActionPlanService<InMemoryActionPlanRepository>;

    async fn setup() -> (Service, Arc<InMemoryActionPlanRepository>, Uuid) {
        let repo = Arc::new(InMemoryActionPlanRepository::new());
        let project = repo
            .create_project(Project {
                id: Uuid::new_v4(),
                key: "org.example:app".to_string(),
                name: "App".to_string(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        (ActionPlanService::new(repo.clone()), repo, project.id)
    }

    fn form(project_id: Uuid, name: &str) -> ActionPlanForm {
        ActionPlanForm {
            name: name.to_string(),
            description: None,
            status: Some("OPEN".to_string()),
            project_id: Some(project_id),
            user_login: Some("alice".to_string()),
            deadline: None,
        }
    }

    async fn review(
        repo: &InMemoryActionPlanRepository,
        project_id: Uuid,
        status: ReviewStatus,
    ) -> Review {
        repo.create_review(Review {
            id: Uuid::new_v4(),
            project_id,
            title: "Possible null dereference".to_string(),
            status,
            assignee_login: None,
            created_at: Utc::now(),
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn create_assigns_key_and_timestamps() {
        let (service, _repo, project) = setup().await;
        let plan = service.create("alice", form(project, "Sprint 1")).await.unwrap();
        assert!(!plan.key.is_empty());
        assert!(plan.is_open());
        assert!(plan.created_at.is_some());
        assert_eq!(service.find_by_key(&plan.key).await.unwrap(), plan);
    }

    #[tokio::test]
    async fn duplicate_name_in_same_project_is_rejected() {
        let (service, _repo, project) = setup().await;
        service.create("alice", form(project, "Sprint 1")).await.unwrap();

        match service.create("bob", form(project, "Sprint 1")).await {
            Err(QualisError::Validation(msg)) => assert_eq!(msg, SAME_NAME_IN_SAME_PROJECT),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_project_is_a_validation_error() {
        let (service, _repo, _project) = setup().await;
        match service.create("alice", form(Uuid::new_v4(), "Sprint 1")).await {
            Err(QualisError::Validation(msg)) => assert_eq!(msg, "Project does not exist"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_keeps_own_name_and_rejects_taken_one() {
        let (service, _repo, project) = setup().await;
        let first = service.create("alice", form(project, "Sprint 1")).await.unwrap();
        service.create("alice", form(project, "Sprint 2")).await.unwrap();

        let updated = service
            .update(&first.key, "alice", |f| {
                f.description = Some("Blockers first".to_string())
            })
            .await
            .unwrap();
        assert_eq!(updated.name, "Sprint 1");
        assert_eq!(updated.description.as_deref(), Some("Blockers first"));

        let result = service
            .update(&first.key, "alice", |f| f.name = "Sprint 2".to_string())
            .await;
        assert!(matches!(result, Err(QualisError::Validation(_))));
    }

    #[tokio::test]
    async fn close_and_reopen() {
        let (service, _repo, project) = setup().await;
        let plan = service.create("alice", form(project, "Sprint 1")).await.unwrap();

        let closed = service.close(&plan.key, "alice").await.unwrap();
        assert!(closed.is_closed());
        assert!(service.open_by_project(project).await.unwrap().is_empty());

        let reopened = service.reopen(&plan.key, "alice").await.unwrap();
        assert!(reopened.is_open());
        assert_eq!(service.open_by_project(project).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_plan_is_not_found() {
        let (service, _repo, _project) = setup().await;
        assert!(matches!(
            service.close("nope", "alice").await,
            Err(QualisError::NotFound(_))
        ));
        assert!(matches!(
            service.progress("nope").await,
            Err(QualisError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn linking_reviews_updates_progress() {
        let (service, repo, project) = setup().await;
        let plan = service.create("alice", form(project, "Sprint 1")).await.unwrap();
        let open = review(&repo, project, ReviewStatus::Open).await;
        let resolved = review(&repo, project, ReviewStatus::Resolved).await;

        service.link_review(&plan.key, open.id).await.unwrap();
        let progress = service.link_review(&plan.key, resolved.id).await.unwrap();
        assert_eq!(
            progress,
            Progress {
                total: 2,
                open: 1,
                resolved: 1
            }
        );
        assert_eq!(service.progress(&plan.key).await.unwrap(), progress);
    }

    #[tokio::test]
    async fn review_from_other_project_is_rejected() {
        let (service, repo, project) = setup().await;
        let plan = service.create("alice", form(project, "Sprint 1")).await.unwrap();
        let foreign = review(&repo, Uuid::new_v4(), ReviewStatus::Open).await;

        assert!(matches!(
            service.link_review(&plan.key, foreign.id).await,
            Err(QualisError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn open_plans_of_unknown_project_is_not_found() {
        let (service, _repo, _project) = setup().await;
        assert!(matches!(
            service.open_by_project(Uuid::new_v4()).await,
            Err(QualisError::NotFound(_))
        ));
    }
}
