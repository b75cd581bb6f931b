//! HTTP API Handlers and Routes
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//! - [`api::extract`](crate::api::extract) - Validating JSON extractor
//! - [`api::openapi`](crate::api::openapi) - Generated OpenAPI document
//!
//! # API Endpoints
//!
//! - `GET /health` - Health check (also served at `/healthy`)
//! - `POST /users` - Register a new user
//! - `POST /login` - Exchange credentials for a JWT
//! - `GET /api/users/{id}` - Fetch a user (auth required)
//! - `DELETE /api/users/{id}` - Soft-delete your own account (auth required)
//! - `GET /api/me` - The authenticated caller (auth required)
//! - `GET /api-docs/openapi.json` - OpenAPI document
//!
//! # Authentication
//!
//! Routes under `/api` require a valid JWT in the `Authorization` header:
//! ```text
//! Authorization: Bearer <token>
//! ```
//!
//! # OpenAPI Documentation
//!
//! When the `swagger-ui` feature is enabled, interactive API documentation
//! is available at `/swagger-ui/`.

/// Request extractors.
pub mod extract;
/// Request and response handlers for all API endpoints.
pub mod handlers;
/// OpenAPI document.
pub mod openapi;
/// Router configuration and route definitions.
pub mod routes;
