//! OpenAPI document generated from the handler annotations.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::api::handlers::{auth, health, users};
use crate::types::{
    ErrorBody, HealthResponse, LoginRequest, LoginResponse, RegisterRequest, UserResponse,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Portcullis API",
        description = "User registration, login and lookup"
    ),
    paths(
        health::health,
        users::register,
        auth::login,
        users::get_user,
        users::delete_user,
        users::me,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        LoginResponse,
        UserResponse,
        HealthResponse,
        ErrorBody,
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "auth", description = "Token issuance"),
        (name = "users", description = "User accounts"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Registers the bearer JWT scheme referenced by protected operations.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
