use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::types::Result;
use crate::users::User;

/// Storage port for user records.
///
/// Soft-deleted records are invisible to both lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persists a new user. Fails if the email is already taken.
    async fn create(&self, user: User) -> Result<User>;

    async fn get_by_id(&self, id: &str) -> Result<Option<User>>;

    /// `email` must already be normalized.
    async fn get_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Marks the user deleted. Returns `false` when no live record matched.
    async fn soft_delete(&self, id: &str, at: DateTime<Utc>) -> Result<bool>;
}
