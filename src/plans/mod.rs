//! Meal plan generation and nutritionist review.
//!
//! A plan is assembled from a [`context::PlanContext`] by the
//! [`assembler::PlanAssembler`], persisted as `pending`, and later approved
//! or rejected exactly once.

use crate::state::AppState;
use axum::Router;

pub mod assembler;
pub mod context;
pub mod document;
mod dto;
pub mod fallback;
pub mod generator;
mod handlers;
pub(crate) mod prompt;
pub(crate) mod repo;
mod repo_types;
pub mod review;
mod services;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
