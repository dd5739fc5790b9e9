use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::{
    dto::{AuthResponse, LoginRequest, RefreshRequest, RegisterRequest, TokenStatus},
    extractors::AuthUser,
    jwt::JwtKeys,
    password::{check_new_password, hash_password, verify_password},
    services::{is_valid_email, normalize_email},
};
use crate::{
    error::AppError,
    profiles::{repo, services::load_profile, AccountType, Profile, ProfileResponse},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/validate-token", get(validate_token))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let RegisterRequest {
        email,
        password,
        name,
        account_type,
        profile: update,
    } = payload;
    let email = normalize_email(&email);

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }
    check_new_password(&password).map_err(|e| {
        warn!("password rejected");
        e
    })?;
    if name.trim().is_empty() {
        return Err(AppError::Validation("name must not be empty".into()));
    }
    update.validate()?;

    if repo::find_by_email(&state.db, &email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let hash = hash_password(&password)?;
    let account_type = account_type.unwrap_or(AccountType::User);
    let mut profile = Profile::new(&email, &hash, name.trim(), account_type);
    update.apply(&mut profile);

    let profile = repo::insert(&state.db, &profile)
        .await
        .map_err(registration_error)?;
    let pair = JwtKeys::from_ref(&state).issue_pair(profile.id, profile.account_type)?;

    info!(
        user_id = %profile.id,
        account_type = profile.account_type.as_str(),
        "profile registered"
    );
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse::bearer(
            pair.access_token,
            pair.refresh_token,
            ProfileResponse::from(profile),
        )),
    ))
}

/// The email check above can race another registration; the unique index has
/// the last word.
fn registration_error(e: anyhow::Error) -> AppError {
    if repo::is_unique_violation(&e) {
        warn!("email registered concurrently");
        AppError::Conflict("Email already registered".into())
    } else {
        AppError::Internal(e)
    }
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = normalize_email(&payload.email);
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }

    let Some(profile) = repo::find_by_email(&state.db, &email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    };

    if !verify_password(&payload.password, &profile.password_hash)? {
        warn!(user_id = %profile.id, "login invalid password");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    let pair = JwtKeys::from_ref(&state).issue_pair(profile.id, profile.account_type)?;
    info!(user_id = %profile.id, "profile logged in");
    Ok(Json(AuthResponse::bearer(
        pair.access_token,
        pair.refresh_token,
        ProfileResponse::from(profile),
    )))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys.verify_refresh(&payload.refresh_token).map_err(|e| {
        warn!(error = %e, "refresh rejected");
        AppError::Unauthorized("Invalid refresh token".into())
    })?;

    let profile = repo::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;

    let pair = keys.issue_pair(profile.id, profile.account_type)?;
    info!(user_id = %profile.id, "tokens rotated");
    Ok(Json(AuthResponse::bearer(
        pair.access_token,
        pair.refresh_token,
        ProfileResponse::from(profile),
    )))
}

#[instrument(skip(state))]
pub async fn validate_token(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<TokenStatus>, AppError> {
    let profile = load_profile(&state.db, user_id).await.map_err(|e| match e {
        AppError::NotFound(_) => AppError::Unauthorized("User not found".into()),
        other => other,
    })?;
    Ok(Json(TokenStatus {
        valid: true,
        user: ProfileResponse::from(profile),
    }))
}

#[cfg(test)]
mod tests {
    use sqlx::error::ErrorKind;

    use super::*;
    use crate::profiles::repo::tests::db_error;

    #[test]
    fn duplicate_email_on_insert_is_a_conflict() {
        let err = registration_error(db_error(ErrorKind::UniqueViolation));
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn non_constraint_insert_failures_stay_internal() {
        let err = registration_error(anyhow::anyhow!("connection reset"));
        assert!(matches!(err, AppError::Internal(_)));
    }
}
