use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::types::AppError;

/// JSON body that must deserialize and pass its `Validate` rules.
///
/// Both kinds of failure become 400 `invalid input: ...`.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                AppError::InvalidInput(format!("invalid input: {}", rejection.body_text()))
            })?;

        value.validate()?;

        Ok(Self(value))
    }
}
