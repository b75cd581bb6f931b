//! Password hashing, token issuance and request authorization.
//!
//! # Module Structure
//!
//! - [`auth::password`](crate::auth::password) - Argon2id hashing and verification
//! - [`auth::jwt`](crate::auth::jwt) - HS256 token issuance and validation
//! - [`auth::middleware`](crate::auth::middleware) - Axum middleware and extractor for protected routes
//!
//! # Security Features
//!
//! - **Password Hashing**: Argon2id with a random salt per hash; verification is constant time
//! - **JWT Tokens**: HS256, 24 hour validity by default, no server-side state
//! - **Uniform failures**: every rejected bearer token yields the same `invalid token` message
//!
//! # Usage
//!
//! ```ignore
//! use portcullis::auth::middleware::{auth_middleware, AuthUser};
//!
//! let app = Router::new()
//!     .route("/me", get(|AuthUser(ctx): AuthUser| async move { ctx.user_id }))
//!     .route_layer(middleware::from_fn_with_state(token_service, auth_middleware));
//! ```
//!
//! # Configuration
//!
//! Configure via `portcullis.toml`:
//! ```toml
//! [auth]
//! jwt_secret_env = "JWT_SECRET_KEY"   # name of the env var holding the secret
//! token_validity_secs = 86400
//! ```

/// HS256 token issuance and validation.
pub mod jwt;
/// Authentication middleware and extractors for protected routes.
pub mod middleware;
/// Argon2id credential hashing.
pub mod password;

pub use jwt::{IssuedToken, TokenError, TokenService};
pub use middleware::{auth_middleware, AuthContext, AuthUser};
pub use password::{CredentialHasher, PasswordError};
