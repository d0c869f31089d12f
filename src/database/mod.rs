pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod record;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use record::{FormFields, RecordError};
pub use repository::{Repositories, ResourceRepository, SubscriberRepository, UserRepository};

use crate::config::DatabaseConfig;

/// Open the configured backend: PostgreSQL when a URL is set, memory otherwise.
pub async fn connect(config: &DatabaseConfig) -> Result<Repositories, DatabaseError> {
    if config.url.is_none() {
        tracing::warn!("DATABASE_URL not set; using the in-memory store (data is lost on restart)");
        return Ok(Repositories::memory());
    }
    let pool = DatabaseManager::connect(config).await?;
    Ok(Repositories::postgres(pool))
}
