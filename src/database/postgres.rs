//! PostgreSQL implementations of the repository traits.
//!
//! Queries are built at runtime (`query_as` + `FromRow`) so the crate compiles
//! without a live database.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Client, ClientPatch, Project, ProjectPatch, Subscriber, User};
use crate::database::repository::{ResourceRepository, SubscriberRepository, UserRepository};

pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResourceRepository<Project> for PgRepository {
    async fn list(&self) -> Result<Vec<Project>, DatabaseError> {
        let rows = sqlx::query_as::<_, Project>(
            "SELECT * FROM projects ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Project>, DatabaseError> {
        let row = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, record: Project) -> Result<Project, DatabaseError> {
        let row = sqlx::query_as::<_, Project>(
            "INSERT INTO projects (id, project_name, project_description, project_image, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(record.id)
        .bind(&record.project_name)
        .bind(&record.project_description)
        .bind(&record.project_image)
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(
        &self,
        id: Uuid,
        patch: ProjectPatch,
        image_url: Option<String>,
    ) -> Result<Option<Project>, DatabaseError> {
        let row = sqlx::query_as::<_, Project>(
            "UPDATE projects SET
                project_name = COALESCE($2, project_name),
                project_description = COALESCE($3, project_description),
                project_image = COALESCE($4, project_image),
                updated_at = now()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(patch.project_name)
        .bind(patch.project_description)
        .bind(image_url)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ResourceRepository<Client> for PgRepository {
    async fn list(&self) -> Result<Vec<Client>, DatabaseError> {
        let rows = sqlx::query_as::<_, Client>(
            "SELECT * FROM clients ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Client>, DatabaseError> {
        let row = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, record: Client) -> Result<Client, DatabaseError> {
        let row = sqlx::query_as::<_, Client>(
            "INSERT INTO clients (id, client_name, client_designation, client_description, client_image, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(record.id)
        .bind(&record.client_name)
        .bind(&record.client_designation)
        .bind(&record.client_description)
        .bind(&record.client_image)
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(
        &self,
        id: Uuid,
        patch: ClientPatch,
        image_url: Option<String>,
    ) -> Result<Option<Client>, DatabaseError> {
        let row = sqlx::query_as::<_, Client>(
            "UPDATE clients SET
                client_name = COALESCE($2, client_name),
                client_designation = COALESCE($3, client_designation),
                client_description = COALESCE($4, client_description),
                client_image = COALESCE($5, client_image),
                updated_at = now()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(patch.client_name)
        .bind(patch.client_designation)
        .bind(patch.client_description)
        .bind(image_url)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl SubscriberRepository for PgRepository {
    async fn list(&self) -> Result<Vec<Subscriber>, DatabaseError> {
        let rows = sqlx::query_as::<_, Subscriber>(
            "SELECT * FROM newsletter_subscribers ORDER BY subscribed_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Subscriber>, DatabaseError> {
        let row = sqlx::query_as::<_, Subscriber>(
            "SELECT * FROM newsletter_subscribers WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert(&self, subscriber: Subscriber) -> Result<Subscriber, DatabaseError> {
        sqlx::query_as::<_, Subscriber>(
            "INSERT INTO newsletter_subscribers (id, email, subscribed_at, created_at)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(subscriber.id)
        .bind(&subscriber.email)
        .bind(subscriber.subscribed_at)
        .bind(subscriber.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_write(e, &subscriber.email))
    }
}

#[async_trait]
impl UserRepository for PgRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let row = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn upsert(&self, user: User) -> Result<User, DatabaseError> {
        let row = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, password_hash, role, created_at)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (email) DO UPDATE
                SET password_hash = EXCLUDED.password_hash,
                    role = EXCLUDED.role
             RETURNING *",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.role)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
