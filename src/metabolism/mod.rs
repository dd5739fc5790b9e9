//! Metabolic estimates derived from a profile snapshot.
//!
//! Everything here is pure: the same profile always yields the same numbers,
//! and nothing is persisted. Profiles without weight, height and age produce
//! `MetabolicError::IncompleteProfile` instead of a value.

mod activity;
mod calculator;
mod goal;

use thiserror::Error;

use activity::ActivityLevel;

pub use activity::ExerciseFrequency;
pub use calculator::MetabolicSnapshot;
pub use goal::GoalClass;
pub(crate) use calculator::round_to;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetabolicError {
    #[error("not computable, missing: {}", .missing.join(", "))]
    IncompleteProfile { missing: Vec<&'static str> },
}
