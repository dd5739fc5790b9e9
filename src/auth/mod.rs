use crate::state::AppState;
use axum::Router;

mod claims;
mod dto;
pub(crate) mod extractors;
mod handlers;
pub(crate) mod jwt;
pub(crate) mod password;
mod services;

pub use extractors::{AuthUser, Reviewer};

pub fn router() -> Router<AppState> {
    handlers::routes()
}
