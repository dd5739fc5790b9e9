use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use super::{
    claims::{Claims, TokenKind},
    jwt::JwtKeys,
};
use crate::error::AppError;

/// Extracts and validates the bearer access token, yielding the profile ID.
pub struct AuthUser(pub Uuid);

/// Like [`AuthUser`] but only for nutritionist accounts; others get 403.
pub struct Reviewer(pub Uuid);

fn access_claims(parts: &Parts, keys: &JwtKeys) -> Result<Claims, AppError> {
    let auth_header = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .or_else(|| auth_header.strip_prefix("bearer "))
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization header".into()))?;

    let claims = keys.verify(token).map_err(|_| {
        warn!("invalid or expired token");
        AppError::Unauthorized("Invalid or expired token".into())
    })?;

    if claims.kind != TokenKind::Access {
        return Err(AppError::Unauthorized("Access token required".into()));
    }
    Ok(claims)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let claims = access_claims(parts, &JwtKeys::from_ref(state))?;
        Ok(AuthUser(claims.sub))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Reviewer
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let claims = access_claims(parts, &JwtKeys::from_ref(state))?;
        if !claims.is_nutritionist() {
            warn!(user_id = %claims.sub, "reviewer route called by end user");
            return Err(AppError::Forbidden(
                "Only nutritionists can access this resource".into(),
            ));
        }
        Ok(Reviewer(claims.sub))
    }
}
