use crate::state::AppState;
use axum::Router;

mod dto;
mod handlers;
pub(crate) mod repo;
mod repo_types;
pub(crate) mod services;

pub use dto::{ProfileResponse, ProfileUpdate};
pub use repo_types::{
    AccountType, Activity, FamilyHistory, Lifestyle, Profile, SelfAssessment, Sex,
};

pub fn router() -> Router<AppState> {
    handlers::routes()
}
