use crate::error::AppError;
use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

/// The `:id` segment of `/<entity>/:id`.
///
/// A segment that is not a UUID is answered with the same `{"error": …}` body
/// as every other rejected request.
#[derive(Debug, Clone, Copy)]
pub struct RecordId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<Uuid>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::InvalidId(rejection.body_text()))?;
        Ok(Self(id))
    }
}
