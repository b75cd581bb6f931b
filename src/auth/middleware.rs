use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::auth::jwt::TokenService;
use crate::types::AppError;

/// Identity attached to a request once its bearer token validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: String,
    pub email: String,
}

/// Gates a route on `Authorization: Bearer <token>`.
///
/// Checks run in order and the first failure ends the request with 401:
/// missing header, wrong shape, then token validation.
pub async fn auth_middleware(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let raw = match req.headers().get(header::AUTHORIZATION) {
        Some(value) if !value.is_empty() => value,
        _ => {
            tracing::debug!("rejected request without credentials");
            return Err(AppError::Auth(
                "no authentication token provided".to_string(),
            ));
        }
    };

    let token = raw
        .to_str()
        .ok()
        .and_then(bearer_token)
        .ok_or_else(|| AppError::Auth("invalid token format".to_string()))?;

    let claims = tokens.validate(token).map_err(|e| {
        tracing::debug!(reason = %e, "rejected bearer token");
        AppError::Auth("invalid token".to_string())
    })?;

    req.extensions_mut().insert(AuthContext {
        user_id: claims.sub,
        email: claims.email,
    });

    Ok(next.run(req).await)
}

/// Exactly two space-separated parts, the first literally `Bearer`.
fn bearer_token(value: &str) -> Option<&str> {
    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Some(token),
        _ => None,
    }
}

/// Extractor for the identity placed by [`auth_middleware`].
pub struct AuthUser(pub AuthContext);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AppError::Auth("no authentication token provided".to_string()))
    }
}
