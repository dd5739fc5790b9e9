use axum::{extract::State, routing::get, Json, Router};
use tracing::{info, instrument};

use super::{
    dto::{ProfileResponse, ProfileUpdate},
    repo,
    services::load_profile,
};
use crate::{auth::AuthUser, error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).put(update_profile))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = load_profile(&state.db, user_id).await?;
    Ok(Json(ProfileResponse::from(profile)))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ProfileUpdate>,
) -> Result<Json<ProfileResponse>, AppError> {
    payload.validate()?;
    let mut profile = load_profile(&state.db, user_id).await?;
    payload.apply(&mut profile);
    let profile = repo::update(&state.db, &profile).await?;
    info!(user_id = %user_id, "profile updated");
    Ok(Json(ProfileResponse::from(profile)))
}
