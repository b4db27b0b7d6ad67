use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::{error::AppError, forms::parse_positive_id};

/// IdParam
///
/// The `{id}` path segment, guaranteed to be a strictly positive integer. Anything else is
/// rejected with `AppError::InvalidCall` before the handler body (and therefore any query) runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdParam(pub i64);

impl<S> FromRequestParts<S> for IdParam
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::InvalidCall)?;

        parse_positive_id(&raw)
            .map(IdParam)
            .ok_or(AppError::InvalidCall)
    }
}
