use std::sync::Arc;

use tracing::info;

use crate::auth::password::{hash_password, verify_password};
use crate::config::SecurityConfig;
use crate::database::models::{Role, User};
use crate::database::{DatabaseError, UserRepository};

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

/// Credential checks and admin bootstrap on top of the user repository.
pub struct AccountService {
    users: Arc<dyn UserRepository>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Create (or reset) the configured admin account. Skipped when no admin
    /// password is configured.
    pub async fn seed_admin(&self, security: &SecurityConfig) -> Result<Option<User>, AccountError> {
        let Some(password) = security.admin_password.clone() else {
            info!("ADMIN_PASSWORD not set; skipping admin account seeding");
            return Ok(None);
        };

        let password_hash = blocking(move || hash_password(&password)).await?;
        let admin = User::new(security.admin_email.trim().to_lowercase(), password_hash, Role::Admin);
        let admin = self.users.upsert(admin).await?;

        info!("Admin account ready: {}", admin.email);
        Ok(Some(admin))
    }

    /// Look up the user by email and verify the password. Unknown email and
    /// wrong password are indistinguishable to the caller.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AccountError> {
        let email = email.trim().to_lowercase();
        let Some(user) = self.users.find_by_email(&email).await? else {
            return Err(AccountError::InvalidCredentials);
        };

        let hash = user.password_hash.clone();
        let password = password.to_string();
        let matches = blocking(move || verify_password(&password, &hash)).await?;

        if matches {
            Ok(user)
        } else {
            Err(AccountError::InvalidCredentials)
        }
    }
}

/// Argon2 is deliberately slow; keep it off the async workers.
async fn blocking<T, F>(f: F) -> Result<T, AccountError>
where
    F: FnOnce() -> Result<T, argon2::password_hash::Error> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AccountError::Hashing(e.to_string()))?
        .map_err(|e| AccountError::Hashing(e.to_string()))
}
