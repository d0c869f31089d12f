//! In-process store used when no `DATABASE_URL` is configured and by the tests.
//! Contents are lost on restart.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{sort_newest_first, Resource, Subscriber, User};
use crate::database::repository::{ResourceRepository, SubscriberRepository, UserRepository};

pub struct MemoryRepository<R> {
    records: RwLock<Vec<R>>,
}

impl<R> Default for MemoryRepository<R> {
    fn default() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl<R: Resource> ResourceRepository<R> for MemoryRepository<R> {
    async fn list(&self) -> Result<Vec<R>, DatabaseError> {
        let mut records = self.records.read().await.clone();
        sort_newest_first(&mut records);
        Ok(records)
    }

    async fn find(&self, id: Uuid) -> Result<Option<R>, DatabaseError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id() == id).cloned())
    }

    async fn insert(&self, record: R) -> Result<R, DatabaseError> {
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: Uuid,
        patch: R::Patch,
        image_url: Option<String>,
    ) -> Result<Option<R>, DatabaseError> {
        let mut records = self.records.write().await;
        let Some(record) = records.iter_mut().find(|r| r.id() == id) else {
            return Ok(None);
        };
        record.apply(patch, image_url);
        Ok(Some(record.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id() != id);
        Ok(records.len() != before)
    }
}

#[derive(Default)]
pub struct MemorySubscribers {
    subscribers: RwLock<Vec<Subscriber>>,
}

#[async_trait]
impl SubscriberRepository for MemorySubscribers {
    async fn list(&self) -> Result<Vec<Subscriber>, DatabaseError> {
        let mut subscribers = self.subscribers.read().await.clone();
        subscribers.sort_by(|a, b| {
            b.subscribed_at
                .cmp(&a.subscribed_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(subscribers)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Subscriber>, DatabaseError> {
        let subscribers = self.subscribers.read().await;
        Ok(subscribers.iter().find(|s| s.email == email).cloned())
    }

    async fn insert(&self, subscriber: Subscriber) -> Result<Subscriber, DatabaseError> {
        let mut subscribers = self.subscribers.write().await;
        // same guarantee as the unique index in postgres
        if subscribers.iter().any(|s| s.email == subscriber.email) {
            return Err(DatabaseError::Duplicate(subscriber.email));
        }
        subscribers.push(subscriber.clone());
        Ok(subscriber)
    }
}

#[derive(Default)]
pub struct MemoryUsers {
    users: RwLock<Vec<User>>,
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn upsert(&self, user: User) -> Result<User, DatabaseError> {
        let mut users = self.users.write().await;
        if let Some(existing) = users.iter_mut().find(|u| u.email == user.email) {
            existing.password_hash = user.password_hash;
            existing.role = user.role;
            return Ok(existing.clone());
        }
        users.push(user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Project, ProjectDraft, ProjectPatch};

    fn project(name: &str) -> Project {
        Project::create(
            ProjectDraft {
                project_name: name.to_string(),
                project_description: "desc".to_string(),
            },
            format!("http://localhost/uploads/projects/{name}.png"),
        )
    }

    #[tokio::test]
    async fn lists_newest_first() {
        let repo = MemoryRepository::<Project>::default();
        repo.insert(project("first")).await.unwrap();
        repo.insert(project("second")).await.unwrap();
        repo.insert(project("third")).await.unwrap();

        let names: Vec<_> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.project_name)
            .collect();
        assert_eq!(names, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_ids() {
        let repo = MemoryRepository::<Project>::default();
        let missing = Uuid::now_v7();
        assert!(repo
            .update(missing, ProjectPatch::default(), None)
            .await
            .unwrap()
            .is_none());
        assert!(!repo.delete(missing).await.unwrap());

        let saved = repo.insert(project("only")).await.unwrap();
        assert!(repo.delete(saved.id).await.unwrap());
        assert!(!repo.delete(saved.id).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_subscriber_is_rejected() {
        let repo = MemorySubscribers::default();
        repo.insert(Subscriber::new("ana@example.com".into()))
            .await
            .unwrap();
        let err = repo
            .insert(Subscriber::new("ana@example.com".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Duplicate(_)));
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }
}
