use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A registered account.
///
/// Deliberately not `Serialize`: the only outward form is
/// [`UserResponse`](crate::types::UserResponse), which has no hash field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub last_name: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Builds a new record with a fresh id and both timestamps set to `now`.
    pub fn new(
        email: String,
        name: String,
        last_name: Option<String>,
        password_hash: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            name,
            last_name,
            password_hash,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Canonical form of an email used as the login key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
