use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use crate::error::AppError;

/// `Json<T>` whose rejections render as `{"error": ...}` with status 400.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::Validation(rejection.body_text())),
        }
    }
}
