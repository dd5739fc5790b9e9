use sqlx::PgPool;
use uuid::Uuid;

use super::{repo, repo_types::Profile};
use crate::error::AppError;

/// Loads the profile behind an authenticated request.
pub async fn load_profile(db: &PgPool, id: Uuid) -> Result<Profile, AppError> {
    repo::find_by_id(db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".into()))
}
