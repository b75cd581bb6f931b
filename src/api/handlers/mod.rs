//! API request handlers.

/// Login handler.
pub mod auth;
/// Liveness probe.
pub mod health;
/// Registration, lookup and deletion of users.
pub mod users;
