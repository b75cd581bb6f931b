//! # Portcullis
//!
//! A small user service: registration, password login issuing JWTs, and
//! bearer-token protected user lookup, laid out as ports and adapters.
//!
//! ## Overview
//!
//! Portcullis can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `portcullis-server` binary
//! 2. **As a library** - Embed the router or the use cases in your own service
//!
//! ### Embedding the router
//!
//! ```rust,ignore
//! use portcullis::{api::routes::create_router, db::DatabaseProvider, AppConfig, AppState};
//! use std::sync::Arc;
//!
//! let config = AppConfig::load("portcullis.toml")?;
//! let repo = DatabaseProvider::from_config(&config.database).create_client().await?;
//! let app = create_router(AppState::new(config, Arc::new(repo)));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `swagger-ui` | Serve interactive API docs at `/swagger-ui` |
//!
//! ## Modules
//!
//! - [`api`] - REST handlers, routes and OpenAPI document
//! - [`auth`] - Password hashing, JWT issuance and the authorization middleware
//! - [`users`] - The user record, repository port and use cases
//! - [`db`] - libsql repository adapter (SQLite file, in-memory, Turso)
//! - [`types`] - Wire types and the application error
//! - [`utils`] - Configuration, logging and the clock

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Password hashing, JWT tokens and authorization middleware.
pub mod auth;
/// Command-line interface.
pub mod cli;
/// Database adapters.
pub mod db;
/// Request/response types and errors.
pub mod types;
/// User domain: model, repository port, use cases.
pub mod users;
/// Configuration, logging and time.
pub mod utils;

// Re-export commonly used types
pub use db::TursoClient;
pub use types::{AppError, Result};
pub use utils::toml_config::AppConfig;

use std::sync::Arc;

use crate::auth::jwt::TokenService;
use crate::users::{UserRepository, UserUseCase};
use crate::utils::clock::{Clock, SystemClock};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Configuration loaded at startup
    pub config: Arc<AppConfig>,
    /// Register, login, get and delete use cases
    pub users: Arc<UserUseCase>,
    /// Token validation for the authorization middleware
    pub token_service: Arc<TokenService>,
}

impl AppState {
    pub fn new(config: AppConfig, repo: Arc<dyn UserRepository>) -> Self {
        Self::with_clock(config, repo, Arc::new(SystemClock))
    }

    /// Like [`AppState::new`] but with an explicit time source for token
    /// issuance, validation and record timestamps.
    pub fn with_clock(
        config: AppConfig,
        repo: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let token_service = Arc::new(TokenService::with_clock(&config, clock.clone()));
        let users = Arc::new(UserUseCase::new(
            repo,
            token_service.clone(),
            clock,
            config.auth.min_password_length,
        ));

        Self {
            config: Arc::new(config),
            users,
            token_service,
        }
    }
}
