use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use qualis_common::error::{QualisError, QualisResult};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::action_plans::models::{ActionPlan, Project, Review, User};
use crate::action_plans::repositories::{
    ActionPlanRepository, ProjectRepository, ReviewRepository, UserRepository,
};

#[derive(Default)]
struct Tables {
    plans: HashMap<Uuid, ActionPlan>,
    reviews: HashMap<Uuid, Review>,
    projects: HashMap<Uuid, Project>,
    users: HashMap<String, User>,
    links: BTreeSet<(Uuid, Uuid)>,
}

/// Process-local store with the same contract as the Postgres repository.
#[derive(Default)]
pub struct InMemoryActionPlanRepository {
    tables: Mutex<Tables>,
}

impl InMemoryActionPlanRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ActionPlanRepository for InMemoryActionPlanRepository {
    async fn find_by_key(&self, key: &str) -> QualisResult<Option<ActionPlan>> {
        let tables = self.tables.lock().await;
        Ok(tables.plans.values().find(|p| p.key == key).cloned())
    }

    async fn find_by_project_and_name(
        &self,
        project_id: Uuid,
        name: &str,
    ) -> QualisResult<Option<ActionPlan>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .plans
            .values()
            .find(|p| p.project_id == project_id && p.name == name)
            .cloned())
    }

    async fn open_by_project(&self, project_id: Uuid) -> QualisResult<Vec<ActionPlan>> {
        let tables = self.tables.lock().await;
        let mut plans: Vec<ActionPlan> = tables
            .plans
            .values()
            .filter(|p| p.project_id == project_id && p.is_open())
            .cloned()
            .collect();
        plans.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(plans)
    }

    async fn create(&self, plan: ActionPlan) -> QualisResult<ActionPlan> {
        let mut tables = self.tables.lock().await;
        if tables.plans.values().any(|p| p.key == plan.key) {
            return Err(QualisError::Database(format!(
                "duplicate action plan key: {}",
                plan.key
            )));
        }
        tables.plans.insert(plan.id, plan.clone());
        Ok(plan)
    }

    async fn update(&self, plan: ActionPlan) -> QualisResult<ActionPlan> {
        let mut tables = self.tables.lock().await;
        match tables.plans.get_mut(&plan.id) {
            Some(stored) => {
                *stored = plan.clone();
                Ok(plan)
            }
            None => Err(QualisError::NotFound(format!(
                "action plan not found: {}",
                plan.key
            ))),
        }
    }

    async fn link_review(&self, plan_id: Uuid, review_id: Uuid) -> QualisResult<()> {
        let mut tables = self.tables.lock().await;
        if !tables.plans.contains_key(&plan_id) {
            return Err(QualisError::NotFound(format!(
                "action plan not found: {plan_id}"
            )));
        }
        if !tables.reviews.contains_key(&review_id) {
            return Err(QualisError::NotFound(format!(
                "review not found: {review_id}"
            )));
        }
        tables.links.insert((plan_id, review_id));
        Ok(())
    }

    async fn list_reviews(&self, plan_id: Uuid) -> QualisResult<Vec<Review>> {
        let tables = self.tables.lock().await;
        let mut reviews: Vec<Review> = tables
            .links
            .iter()
            .filter(|(p, _)| *p == plan_id)
            .filter_map(|(_, r)| tables.reviews.get(r).cloned())
            .collect();
        reviews.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(reviews)
    }
}

#[async_trait]
impl ReviewRepository for InMemoryActionPlanRepository {
    async fn get_review(&self, id: Uuid) -> QualisResult<Option<Review>> {
        Ok(self.tables.lock().await.reviews.get(&id).cloned())
    }

    async fn create_review(&self, review: Review) -> QualisResult<Review> {
        self.tables
            .lock()
            .await
            .reviews
            .insert(review.id, review.clone());
        Ok(review)
    }
}

#[async_trait]
impl ProjectRepository for InMemoryActionPlanRepository {
    async fn get_project(&self, id: Uuid) -> QualisResult<Option<Project>> {
        Ok(self.tables.lock().await.projects.get(&id).cloned())
    }

    async fn create_project(&self, project: Project) -> QualisResult<Project> {
        self.tables
            .lock()
            .await
            .projects
            .insert(project.id, project.clone());
        Ok(project)
    }
}

#[async_trait]
impl UserRepository for InMemoryActionPlanRepository {
    async fn get_user_by_login(&self, login: &str) -> QualisResult<Option<User>> {
        Ok(self.tables.lock().await.users.get(login).cloned())
    }

    async fn create_user(&self, user: User) -> QualisResult<User> {
        self.tables
            .lock()
            .await
            .users
            .insert(user.login.clone(), user.clone());
        Ok(user)
    }
}
