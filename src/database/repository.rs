use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::memory::{MemoryRepository, MemorySubscribers, MemoryUsers};
use crate::database::models::{Client, Project, Resource, Subscriber, User};
use crate::database::postgres::PgRepository;

/// Persistence for one image-backed resource collection.
#[async_trait]
pub trait ResourceRepository<R: Resource>: Send + Sync {
    /// All records, newest first.
    async fn list(&self) -> Result<Vec<R>, DatabaseError>;

    async fn find(&self, id: Uuid) -> Result<Option<R>, DatabaseError>;

    async fn insert(&self, record: R) -> Result<R, DatabaseError>;

    /// Returns `None` when no record has this id.
    async fn update(
        &self,
        id: Uuid,
        patch: R::Patch,
        image_url: Option<String>,
    ) -> Result<Option<R>, DatabaseError>;

    /// Returns `false` when no record has this id.
    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait SubscriberRepository: Send + Sync {
    /// All subscribers, most recent subscription first.
    async fn list(&self) -> Result<Vec<Subscriber>, DatabaseError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Subscriber>, DatabaseError>;

    /// Fails with [`DatabaseError::Duplicate`] if the email is already present.
    async fn insert(&self, subscriber: Subscriber) -> Result<Subscriber, DatabaseError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    /// Insert the user, or overwrite password hash and role of the existing
    /// user with the same email.
    async fn upsert(&self, user: User) -> Result<User, DatabaseError>;
}

#[derive(Clone)]
enum Backend {
    Postgres(sqlx::PgPool),
    Memory,
}

/// Handles to every collection, shared by all requests.
#[derive(Clone)]
pub struct Repositories {
    pub projects: Arc<dyn ResourceRepository<Project>>,
    pub clients: Arc<dyn ResourceRepository<Client>>,
    pub subscribers: Arc<dyn SubscriberRepository>,
    pub users: Arc<dyn UserRepository>,
    backend: Backend,
}

impl Repositories {
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        let repo = Arc::new(PgRepository::new(pool.clone()));
        Self {
            projects: repo.clone(),
            clients: repo.clone(),
            subscribers: repo.clone(),
            users: repo,
            backend: Backend::Postgres(pool),
        }
    }

    pub fn memory() -> Self {
        Self {
            projects: Arc::new(MemoryRepository::<Project>::default()),
            clients: Arc::new(MemoryRepository::<Client>::default()),
            subscribers: Arc::new(MemorySubscribers::default()),
            users: Arc::new(MemoryUsers::default()),
            backend: Backend::Memory,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Postgres(_) => "postgres",
            Backend::Memory => "memory",
        }
    }

    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        match &self.backend {
            Backend::Postgres(pool) => DatabaseManager::health_check(pool).await,
            Backend::Memory => Ok(()),
        }
    }
}
