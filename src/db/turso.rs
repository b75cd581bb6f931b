use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{Builder, Connection, Database, Row, Value};

use crate::types::{AppError, Result};
use crate::users::{User, UserRepository};

const USER_COLUMNS: &str =
    "id, email, name, last_name, password_hash, created_at, updated_at, deleted_at";

/// libsql-backed user store: a local SQLite file, an in-memory database, or
/// a remote Turso database.
pub struct TursoClient {
    db: Database,
    // `:memory:` hands out a fresh empty database per connect(), so an
    // in-memory client pins a single connection.
    shared: Option<Connection>,
}

impl TursoClient {
    pub async fn new_remote(url: String, auth_token: String) -> Result<Self> {
        let db = Builder::new_remote(url, auth_token)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Turso: {}", e)))?;

        Self::init(db, false).await
    }

    pub async fn new_local(path: &str) -> Result<Self> {
        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database {}: {}", path, e)))?;

        Self::init(db, false).await
    }

    pub async fn new_memory() -> Result<Self> {
        let db = Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open in-memory database: {}", e)))?;

        Self::init(db, true).await
    }

    async fn init(db: Database, pin_connection: bool) -> Result<Self> {
        let shared = if pin_connection {
            Some(
                db.connect()
                    .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))?,
            )
        } else {
            None
        };

        let client = Self { db, shared };
        client.initialize_schema().await?;

        Ok(client)
    }

    pub fn connection(&self) -> Result<Connection> {
        if let Some(conn) = &self.shared {
            return Ok(conn.clone());
        }

        self.db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))
    }

    async fn initialize_schema(&self) -> Result<()> {
        let conn = self.connection()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL,
                name TEXT NOT NULL,
                last_name TEXT,
                password_hash TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                deleted_at INTEGER
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create users table: {}", e)))?;

        // Soft-deleted rows release their email for re-registration.
        conn.execute(
            "CREATE UNIQUE INDEX IF NOT EXISTS users_email_live
             ON users(email) WHERE deleted_at IS NULL",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create email index: {}", e)))?;

        Ok(())
    }

    async fn query_one(&self, sql: &str, key: &str) -> Result<Option<User>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(sql, [key])
            .await
            .map_err(|e| AppError::Database(format!("Failed to query user: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => Ok(Some(user_from_row(&row)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl UserRepository for TursoClient {
    async fn create(&self, user: User) -> Result<User> {
        let conn = self.connection()?;

        conn.execute(
            "INSERT INTO users (id, email, name, last_name, password_hash, created_at, updated_at, deleted_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            (
                user.id.as_str(),
                user.email.as_str(),
                user.name.as_str(),
                optional_text(user.last_name.as_deref()),
                user.password_hash.as_str(),
                user.created_at.timestamp(),
                user.updated_at.timestamp(),
                optional_timestamp(user.deleted_at),
            ),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create user: {}", e)))?;

        Ok(user)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<User>> {
        self.query_one(
            &format!(
                "SELECT {} FROM users WHERE id = ? AND deleted_at IS NULL",
                USER_COLUMNS
            ),
            id,
        )
        .await
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        self.query_one(
            &format!(
                "SELECT {} FROM users WHERE email = ? AND deleted_at IS NULL",
                USER_COLUMNS
            ),
            email,
        )
        .await
    }

    async fn soft_delete(&self, id: &str, at: DateTime<Utc>) -> Result<bool> {
        let conn = self.connection()?;

        let affected = conn
            .execute(
                "UPDATE users SET deleted_at = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
                (at.timestamp(), at.timestamp(), id),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete user: {}", e)))?;

        Ok(affected > 0)
    }
}

fn optional_text(value: Option<&str>) -> Value {
    match value {
        Some(s) => Value::Text(s.to_string()),
        None => Value::Null,
    }
}

fn optional_timestamp(value: Option<DateTime<Utc>>) -> Value {
    match value {
        Some(at) => Value::Integer(at.timestamp()),
        None => Value::Null,
    }
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| AppError::Database(format!("Invalid stored timestamp: {}", secs)))
}

fn user_from_row(row: &Row) -> Result<User> {
    let db_err = |e: libsql::Error| AppError::Database(e.to_string());

    let last_name = match row.get_value(3).map_err(db_err)? {
        Value::Null => None,
        Value::Text(s) => Some(s),
        other => {
            return Err(AppError::Database(format!(
                "Unexpected last_name value: {:?}",
                other
            )))
        }
    };

    let deleted_at = match row.get_value(7).map_err(db_err)? {
        Value::Null => None,
        Value::Integer(secs) => Some(timestamp(secs)?),
        other => {
            return Err(AppError::Database(format!(
                "Unexpected deleted_at value: {:?}",
                other
            )))
        }
    };

    Ok(User {
        id: row.get(0).map_err(db_err)?,
        email: row.get(1).map_err(db_err)?,
        name: row.get(2).map_err(db_err)?,
        last_name,
        password_hash: row.get(4).map_err(db_err)?,
        created_at: timestamp(row.get::<i64>(5).map_err(db_err)?)?,
        updated_at: timestamp(row.get::<i64>(6).map_err(db_err)?)?,
        deleted_at,
    })
}
