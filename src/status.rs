use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tracing::instrument;

use crate::{error::AppError, plans, profiles, state::AppState};

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub ai_configured: bool,
    pub users: i64,
    pub nutritionists: i64,
    pub plans: i64,
    pub pending_plans: i64,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/status", get(status))
}

#[instrument(skip(state))]
pub async fn status(State(state): State<AppState>) -> Result<Json<StatusResponse>, AppError> {
    let users = profiles::repo::count_by_type(&state.db, profiles::AccountType::User).await?;
    let nutritionists =
        profiles::repo::count_by_type(&state.db, profiles::AccountType::Nutritionist).await?;
    let counts = plans::repo::counts(&state.db).await?;
    Ok(Json(StatusResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        ai_configured: state.generator.is_configured(),
        users,
        nutritionists,
        plans: counts.total,
        pending_plans: counts.pending,
    }))
}
