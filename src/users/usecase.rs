use std::sync::Arc;

use chrono::SubsecRound;

use crate::auth::jwt::{IssuedToken, TokenService};
use crate::auth::password::{CredentialHasher, DUMMY_HASH};
use crate::types::{AppError, RegisterRequest, Result};
use crate::users::model::normalize_email;
use crate::users::{User, UserRepository};
use crate::utils::clock::Clock;

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Registration input.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub last_name: Option<String>,
    pub password: String,
}

impl From<RegisterRequest> for NewUser {
    fn from(req: RegisterRequest) -> Self {
        Self {
            email: req.email,
            name: req.name,
            last_name: req.last_name,
            password: req.password,
        }
    }
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: IssuedToken,
    pub user: User,
}

/// Account use cases over a [`UserRepository`].
pub struct UserUseCase {
    repo: Arc<dyn UserRepository>,
    hasher: CredentialHasher,
    tokens: Arc<TokenService>,
    clock: Arc<dyn Clock>,
    min_password_length: usize,
}

impl UserUseCase {
    pub fn new(
        repo: Arc<dyn UserRepository>,
        tokens: Arc<TokenService>,
        clock: Arc<dyn Clock>,
        min_password_length: usize,
    ) -> Self {
        Self {
            repo,
            hasher: CredentialHasher::new(),
            tokens,
            clock,
            min_password_length,
        }
    }

    /// Hashes the password and stores a new account.
    ///
    /// Any repository failure, a taken email included, surfaces as an
    /// opaque persistence error.
    pub async fn register(&self, input: NewUser) -> Result<User> {
        if input.password.chars().count() < self.min_password_length {
            return Err(AppError::InvalidInput(format!(
                "invalid input: password must be at least {} characters",
                self.min_password_length
            )));
        }

        let password_hash = self.hash(input.password).await?;
        let last_name = input
            .last_name
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let user = User::new(
            normalize_email(&input.email),
            input.name.trim().to_string(),
            last_name,
            password_hash,
            self.clock.now().trunc_subsecs(0),
        );

        let created = self.repo.create(user).await?;
        tracing::info!(user_id = %created.id, "registered user");

        Ok(created)
    }

    /// Checks credentials and issues a token.
    ///
    /// Unknown email and wrong password fail identically. The unknown
    /// branch still runs a verification so both take the same time.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let email = normalize_email(email);

        let Some(user) = self.repo.get_by_email(&email).await? else {
            let _ = self.verify(DUMMY_HASH.to_string(), password.to_string()).await;
            tracing::debug!("login for unknown account");
            return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
        };

        if !self
            .verify(user.password_hash.clone(), password.to_string())
            .await?
        {
            tracing::debug!(user_id = %user.id, "login with wrong password");
            return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.tokens.issue(&user.id, &user.email)?;
        tracing::info!(user_id = %user.id, "user logged in");

        Ok(LoginOutcome { token, user })
    }

    pub async fn get_user(&self, id: &str) -> Result<User> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".to_string()))
    }

    /// Soft-deletes `target_id`. Users may only delete themselves.
    pub async fn delete_user(&self, requester_id: &str, target_id: &str) -> Result<()> {
        if requester_id != target_id {
            return Err(AppError::Forbidden(
                "users may only delete their own account".to_string(),
            ));
        }

        let now = self.clock.now().trunc_subsecs(0);
        if !self.repo.soft_delete(target_id, now).await? {
            return Err(AppError::NotFound("user not found".to_string()));
        }
        tracing::info!(user_id = %target_id, "soft-deleted user");

        Ok(())
    }

    async fn hash(&self, password: String) -> Result<String> {
        let hasher = self.hasher.clone();
        let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("hashing task failed: {}", e)))??;
        Ok(hash)
    }

    async fn verify(&self, hash: String, password: String) -> Result<bool> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&hash, &password))
            .await
            .map_err(|e| AppError::Internal(format!("verification task failed: {}", e)))?
            .map_err(AppError::from)
    }
}
