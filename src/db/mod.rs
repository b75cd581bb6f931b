//! Persistence adapters.
//!
//! [`TursoClient`] implements [`UserRepository`](crate::users::UserRepository)
//! over libsql. [`DatabaseProvider`] picks the backend from configuration:
//!
//! ```rust,ignore
//! use portcullis::db::DatabaseProvider;
//!
//! // Use in-memory database (tests and throwaway runs)
//! let db = DatabaseProvider::Memory.create_client().await?;
//!
//! // Use file-based SQLite
//! let db = DatabaseProvider::SQLite { path: "data.db".into() }.create_client().await?;
//!
//! // Use remote Turso
//! let db = DatabaseProvider::Turso { url, auth_token }.create_client().await?;
//! ```

use std::path::Path;

use crate::types::{AppError, Result};
use crate::utils::toml_config::DatabaseConfig;

/// libsql user repository.
pub mod turso;

pub use turso::TursoClient;

/// Database provider configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DatabaseProvider {
    /// In-memory SQLite database (ephemeral, lost on restart)
    #[default]
    Memory,
    /// File-based SQLite database
    SQLite {
        /// Path to the SQLite database file
        path: String,
    },
    /// Remote Turso database (requires network access)
    Turso {
        /// The Turso database URL (e.g., `libsql://your-db.turso.io`)
        url: String,
        /// Authentication token for the Turso database
        auth_token: String,
    },
}

impl DatabaseProvider {
    /// Remote Turso wins when both its URL and token resolved; otherwise
    /// `database.url` names a file or `:memory:`.
    pub fn from_config(config: &DatabaseConfig) -> Self {
        if let (Some(url), Some(token)) = (&config.turso_url, &config.turso_token) {
            return DatabaseProvider::Turso {
                url: url.clone(),
                auth_token: token.clone(),
            };
        }

        if config.url == ":memory:" {
            return DatabaseProvider::Memory;
        }

        DatabaseProvider::SQLite {
            path: config.url.clone(),
        }
    }

    /// Create a database client from this provider configuration
    pub async fn create_client(&self) -> Result<TursoClient> {
        match self {
            DatabaseProvider::Memory => TursoClient::new_memory().await,
            DatabaseProvider::SQLite { path } => {
                if let Some(parent) = Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent).map_err(|e| {
                            AppError::Database(format!(
                                "Failed to create database directory {}: {}",
                                parent.display(),
                                e
                            ))
                        })?;
                    }
                }
                TursoClient::new_local(path).await
            }
            DatabaseProvider::Turso { url, auth_token } => {
                TursoClient::new_remote(url.clone(), auth_token.clone()).await
            }
        }
    }

    /// Short description for startup logs. Never includes credentials.
    pub fn describe(&self) -> String {
        match self {
            DatabaseProvider::Memory => "in-memory".to_string(),
            DatabaseProvider::SQLite { path } => format!("sqlite:{}", path),
            DatabaseProvider::Turso { url, .. } => format!("turso:{}", url),
        }
    }
}
