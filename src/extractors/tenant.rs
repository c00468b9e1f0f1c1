use axum::{extract::FromRequestParts, http::request::Parts};

use crate::AppError;

pub const ORGANIZATION_HEADER: &str = "X-Organization-Id";

/// Tenant the request operates on, taken from the `X-Organization-Id` header.
/// Every contract and job lookup is scoped by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Organization(pub i32);

impl<S> FromRequestParts<S> for Organization
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(ORGANIZATION_HEADER)
            .ok_or_else(|| AppError::BadRequest(format!("Missing {} header", ORGANIZATION_HEADER)))?;

        let id = value
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<i32>().ok())
            .filter(|id| *id > 0)
            .ok_or_else(|| {
                AppError::BadRequest(format!("{} must be a positive integer", ORGANIZATION_HEADER))
            })?;

        Ok(Organization(id))
    }
}
