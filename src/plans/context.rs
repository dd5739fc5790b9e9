use serde::Serialize;

use crate::{
    metabolism::{GoalClass, MetabolicSnapshot},
    profiles::{Lifestyle, Profile},
};

pub const DEFAULT_BUDGET_PER_MEAL: f64 = 25.0;

/// Everything plan assembly reads from a profile, captured once per request.
#[derive(Debug, Clone, Serialize)]
pub struct PlanContext {
    pub name: String,
    pub age: Option<i32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub goal: Option<String>,
    pub budget_per_meal: f64,
    pub dietary_restrictions: Option<String>,
    pub lifestyle: Lifestyle,
    pub exercise_sessions: Option<String>,
    pub water_intake: Option<i32>,
    pub food_dislikes: Option<String>,
    pub family_conditions: Vec<&'static str>,
    pub metrics: MetabolicSnapshot,
}

impl PlanContext {
    pub fn from_profile(profile: &Profile) -> Self {
        let exercise_sessions = profile
            .activity
            .exercise_frequency
            .as_ref()
            .map(|f| f.to_string());
        Self {
            name: profile.name.clone(),
            age: profile.age,
            weight_kg: profile.weight_kg,
            height_cm: profile.height_cm,
            goal: profile.goal.clone(),
            budget_per_meal: profile
                .budget_per_meal
                .filter(|b| *b > 0.0)
                .unwrap_or(DEFAULT_BUDGET_PER_MEAL),
            dietary_restrictions: profile.dietary_restrictions.clone(),
            lifestyle: profile.lifestyle.clone(),
            exercise_sessions,
            water_intake: profile.behavior.water_intake,
            food_dislikes: profile.behavior.food_dislikes.clone(),
            family_conditions: profile.family_history.conditions(),
            metrics: MetabolicSnapshot::of(profile),
        }
    }

    pub fn goal_class(&self) -> GoalClass {
        self.metrics.goal_class
    }

    /// Goal text as written by the user, or the class label when unset.
    pub fn goal_text(&self) -> &str {
        match self.goal.as_deref().map(str::trim) {
            Some(g) if !g.is_empty() => g,
            _ => self.goal_class().label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metabolism::ExerciseFrequency;
    use crate::profiles::AccountType;

    #[test]
    fn missing_budget_defaults() {
        let p = Profile::new("a@b.co", "h", "Ana", AccountType::User);
        let ctx = PlanContext::from_profile(&p);
        assert_eq!(ctx.budget_per_meal, DEFAULT_BUDGET_PER_MEAL);
        assert_eq!(ctx.goal_text(), "maintenance");
        assert!(ctx.family_conditions.is_empty());
    }

    #[test]
    fn captures_profile_fields() {
        let mut p = Profile::new("a@b.co", "h", "Carlos", AccountType::User);
        p.budget_per_meal = Some(30.0);
        p.goal = Some("ganhar massa".into());
        p.family_history.diabetes = true;
        p.activity.exercise_frequency = Some(ExerciseFrequency::WeeklyCount(5.0));

        let ctx = PlanContext::from_profile(&p);
        assert_eq!(ctx.budget_per_meal, 30.0);
        assert_eq!(ctx.goal_class(), GoalClass::Gain);
        assert_eq!(ctx.goal_text(), "ganhar massa");
        assert_eq!(ctx.family_conditions, vec!["diabetes"]);
        assert_eq!(ctx.exercise_sessions.as_deref(), Some("5"));
    }
}
