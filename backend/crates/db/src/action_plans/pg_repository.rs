use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::action_plans::models::{ActionPlan, Project, Review, User};
use crate::action_plans::repositories::{
    ActionPlanRepository, ProjectRepository, ReviewRepository, UserRepository,
};
use qualis_common::error::{QualisError, QualisResult};

const PLAN_COLUMNS: &str = "id, kee, name, description, status, project_id, user_login, \
                            deadline, created_at, updated_at";

#[derive(Clone)]
pub struct PgActionPlanRepository {
    pool: PgPool,
}

impl PgActionPlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn db_err(e: sqlx::Error) -> QualisError {
    QualisError::Database(e.to_string())
}

fn map_plan_row(row: &PgRow) -> QualisResult<ActionPlan> {
    let status: String = row.get("status");
    Ok(ActionPlan {
        id: row.get("id"),
        key: row.get("kee"),
        name: row.get("name"),
        description: row.get("description"),
        status: status.parse().map_err(QualisError::Database)?,
        project_id: row.get("project_id"),
        user_login: row.get("user_login"),
        deadline: row.get("deadline"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn map_review_row(row: &PgRow) -> QualisResult<Review> {
    let status: String = row.get("status");
    Ok(Review {
        id: row.get("id"),
        project_id: row.get("project_id"),
        title: row.get("title"),
        status: status.parse().map_err(QualisError::Database)?,
        assignee_login: row.get("assignee_login"),
        created_at: row.get("created_at"),
    })
}

#[async_trait]
impl ActionPlanRepository for PgActionPlanRepository {
    async fn find_by_key(&self, key: &str) -> QualisResult<Option<ActionPlan>> {
        let row = sqlx::query(&format!(
            "select {PLAN_COLUMNS} from action_plans where kee = $1"
        ))
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(map_plan_row).transpose()
    }

    async fn find_by_project_and_name(
        &self,
        project_id: Uuid,
        name: &str,
    ) -> QualisResult<Option<ActionPlan>> {
        let row = sqlx::query(&format!(
            "select {PLAN_COLUMNS} from action_plans
             where project_id = $1 and name = $2
             limit 1"
        ))
        .bind(project_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(map_plan_row).transpose()
    }

    async fn open_by_project(&self, project_id: Uuid) -> QualisResult<Vec<ActionPlan>> {
        let rows = sqlx::query(&format!(
            "select {PLAN_COLUMNS} from action_plans
             where status = 'OPEN' and project_id = $1
             order by name"
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(map_plan_row).collect()
    }

    async fn create(&self, plan: ActionPlan) -> QualisResult<ActionPlan> {
        let row = sqlx::query(&format!(
            "insert into action_plans
             (id, kee, name, description, status, project_id, user_login, deadline,
              created_at, updated_at)
             values ($1, $2, $3, $4, $5, $6, $7, $8,
                     coalesce($9, now()), coalesce($10, now()))
             returning {PLAN_COLUMNS}"
        ))
        .bind(plan.id)
        .bind(&plan.key)
        .bind(&plan.name)
        .bind(&plan.description)
        .bind(plan.status.as_str())
        .bind(plan.project_id)
        .bind(&plan.user_login)
        .bind(plan.deadline)
        .bind(plan.created_at)
        .bind(plan.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        map_plan_row(&row)
    }

    async fn update(&self, plan: ActionPlan) -> QualisResult<ActionPlan> {
        let row = sqlx::query(&format!(
            "update action_plans
             set name = $2, description = $3, status = $4, user_login = $5,
                 deadline = $6, updated_at = coalesce($7, now())
             where id = $1
             returning {PLAN_COLUMNS}"
        ))
        .bind(plan.id)
        .bind(&plan.name)
        .bind(&plan.description)
        .bind(plan.status.as_str())
        .bind(&plan.user_login)
        .bind(plan.deadline)
        .bind(plan.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or_else(|| QualisError::NotFound(format!("action plan not found: {}", plan.key)))?;

        map_plan_row(&row)
    }

    async fn link_review(&self, plan_id: Uuid, review_id: Uuid) -> QualisResult<()> {
        sqlx::query(
            "insert into action_plans_reviews (action_plan_id, review_id)
             values ($1, $2)
             on conflict do nothing",
        )
        .bind(plan_id)
        .bind(review_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();
            if msg.contains("violates foreign key") {
                QualisError::NotFound(format!(
                    "action plan {plan_id} or review {review_id} not found"
                ))
            } else {
                QualisError::Database(msg)
            }
        })?;
        Ok(())
    }

    async fn list_reviews(&self, plan_id: Uuid) -> QualisResult<Vec<Review>> {
        let rows = sqlx::query(
            "select r.id, r.project_id, r.title, r.status, r.assignee_login, r.created_at
             from reviews r
             join action_plans_reviews apr on apr.review_id = r.id
             where apr.action_plan_id = $1
             order by r.created_at",
        )
        .bind(plan_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(map_review_row).collect()
    }
}

#[async_trait]
impl ReviewRepository for PgActionPlanRepository {
    async fn get_review(&self, id: Uuid) -> QualisResult<Option<Review>> {
        let row = sqlx::query(
            "select id, project_id, title, status, assignee_login, created_at
             from reviews where id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(map_review_row).transpose()
    }

    async fn create_review(&self, review: Review) -> QualisResult<Review> {
        let row = sqlx::query(
            "insert into reviews (id, project_id, title, status, assignee_login, created_at)
             values ($1, $2, $3, $4, $5, $6)
             returning id, project_id, title, status, assignee_login, created_at",
        )
        .bind(review.id)
        .bind(review.project_id)
        .bind(&review.title)
        .bind(review.status.as_str())
        .bind(&review.assignee_login)
        .bind(review.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        map_review_row(&row)
    }
}

#[async_trait]
impl ProjectRepository for PgActionPlanRepository {
    async fn get_project(&self, id: Uuid) -> QualisResult<Option<Project>> {
        let row = sqlx::query("select id, kee, name, created_at from projects where id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(row.map(|r| Project {
            id: r.get("id"),
            key: r.get("kee"),
            name: r.get("name"),
            created_at: r.get("created_at"),
        }))
    }

    async fn create_project(&self, project: Project) -> QualisResult<Project> {
        let row = sqlx::query(
            "insert into projects (id, kee, name, created_at)
             values ($1, $2, $3, $4)
             returning id, kee, name, created_at",
        )
        .bind(project.id)
        .bind(&project.key)
        .bind(&project.name)
        .bind(project.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(Project {
            id: row.get("id"),
            key: row.get("kee"),
            name: row.get("name"),
            created_at: row.get("created_at"),
        })
    }
}

#[async_trait]
impl UserRepository for PgActionPlanRepository {
    async fn get_user_by_login(&self, login: &str) -> QualisResult<Option<User>> {
        let row = sqlx::query("select id, login, name, email from users where login = $1")
            .bind(login)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(row.map(|r| User {
            id: r.get("id"),
            login: r.get("login"),
            name: r.get("name"),
            email: r.get("email"),
        }))
    }

    async fn create_user(&self, user: User) -> QualisResult<User> {
        sqlx::query("insert into users (id, login, name, email) values ($1, $2, $3, $4)")
            .bind(user.id)
            .bind(&user.login)
            .bind(&user.name)
            .bind(&user.email)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(user)
    }
}
