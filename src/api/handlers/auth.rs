use axum::{extract::State, Json};

use crate::{
    api::extract::ValidatedJson,
    types::{ErrorBody, LoginRequest, LoginResponse, Result, UserResponse},
    AppState,
};

/// Login with email and password
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Malformed request", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let outcome = state.users.login(&payload.email, &payload.password).await?;

    Ok(Json(LoginResponse {
        token: outcome.token.token,
        token_type: "Bearer".to_string(),
        expires_at: outcome.token.expires_at,
        user: UserResponse::from(outcome.user),
    }))
}
