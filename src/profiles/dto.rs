use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo_types::{
    Activity, BodyMeasurements, EatingBehavior, FamilyHistory, GoalDetails, Lifestyle,
    Medications, Profile, SelfAssessment, Sex,
};
use crate::{
    error::AppError,
    metabolism::{ExerciseFrequency, MetabolicSnapshot},
};

/// Profile as returned to clients, with its derived metabolic view.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub profile: Profile,
    pub metrics: MetabolicSnapshot,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        let metrics = MetabolicSnapshot::of(&profile);
        Self { profile, metrics }
    }
}

/// Partial profile update. Absent fields are left unchanged; a present group
/// replaces the stored group as a whole.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub sex: Option<Sex>,
    pub age: Option<i32>,
    #[serde(alias = "weight")]
    pub weight_kg: Option<f64>,
    #[serde(alias = "height")]
    pub height_cm: Option<f64>,
    pub goal: Option<String>,
    pub budget_per_meal: Option<f64>,
    pub dietary_restrictions: Option<String>,
    pub body: Option<BodyMeasurements>,
    pub behavior: Option<EatingBehavior>,
    pub lifestyle: Option<Lifestyle>,
    pub family_history: Option<FamilyHistory>,
    pub activity: Option<Activity>,
    pub medications: Option<Medications>,
    pub self_assessment: Option<SelfAssessment>,
    pub goal_details: Option<GoalDetails>,
    // nutritionist accounts only
    pub license_number: Option<String>,
    pub specialization: Option<String>,
}

impl ProfileUpdate {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(AppError::Validation("name must not be empty".into()));
            }
        }
        check_range("age", self.age, 1, 130)?;
        check_positive("weight_kg", self.weight_kg)?;
        check_positive("height_cm", self.height_cm)?;
        if matches!(self.budget_per_meal, Some(b) if b < 0.0 || !b.is_finite()) {
            return Err(AppError::Validation("budget_per_meal must be >= 0".into()));
        }
        if let Some(l) = &self.lifestyle {
            check_range("lifestyle.stress_level", l.stress_level, 1, 10)?;
            if matches!(l.sleep_hours, Some(h) if !(0.0..=24.0).contains(&h)) {
                return Err(AppError::Validation(
                    "lifestyle.sleep_hours must be between 0 and 24".into(),
                ));
            }
        }
        if let Some(s) = &self.self_assessment {
            check_range("self_assessment.energy_level", s.energy_level, 1, 10)?;
            check_range("self_assessment.disposition_level", s.disposition_level, 1, 10)?;
        }
        if let Some(b) = &self.behavior {
            check_range("behavior.water_intake", b.water_intake, 0, 100)?;
        }
        if let Some(ExerciseFrequency::WeeklyCount(n)) =
            self.activity.as_ref().and_then(|a| a.exercise_frequency.as_ref())
        {
            if *n < 0.0 || !n.is_finite() {
                return Err(AppError::Validation(
                    "activity.exercise_frequency must not be negative".into(),
                ));
            }
        }
        Ok(())
    }

    /// Writes the provided fields into `profile`. Credentials are ignored for
    /// end-user accounts.
    pub fn apply(self, profile: &mut Profile) {
        let is_nutritionist = profile.is_nutritionist();
        let Self {
            name,
            sex,
            age,
            weight_kg,
            height_cm,
            goal,
            budget_per_meal,
            dietary_restrictions,
            body,
            behavior,
            lifestyle,
            family_history,
            activity,
            medications,
            self_assessment,
            goal_details,
            license_number,
            specialization,
        } = self;

        if let Some(v) = name {
            profile.name = v.trim().to_string();
        }
        set_if_some(&mut profile.sex, sex);
        set_if_some(&mut profile.age, age);
        set_if_some(&mut profile.weight_kg, weight_kg);
        set_if_some(&mut profile.height_cm, height_cm);
        set_if_some(&mut profile.goal, goal.map(|g| g.trim().to_string()));
        set_if_some(&mut profile.budget_per_meal, budget_per_meal);
        set_if_some(&mut profile.dietary_restrictions, dietary_restrictions);

        if let Some(v) = body {
            profile.body = v;
        }
        if let Some(v) = behavior {
            profile.behavior = v;
        }
        if let Some(v) = lifestyle {
            profile.lifestyle = v;
        }
        if let Some(v) = family_history {
            profile.family_history = v;
        }
        if let Some(v) = activity {
            profile.activity = v;
        }
        if let Some(v) = medications {
            profile.medications = v;
        }
        if let Some(v) = self_assessment {
            profile.self_assessment = v;
        }
        if let Some(v) = goal_details {
            profile.goal_details = v;
        }

        if is_nutritionist {
            set_if_some(&mut profile.license_number, license_number);
            set_if_some(&mut profile.specialization, specialization);
        }

        profile.updated_at = OffsetDateTime::now_utc();
    }
}

fn set_if_some<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

fn check_range(field: &str, value: Option<i32>, min: i32, max: i32) -> Result<(), AppError> {
    match value {
        Some(v) if v < min || v > max => Err(AppError::Validation(format!(
            "{field} must be between {min} and {max}"
        ))),
        _ => Ok(()),
    }
}

fn check_positive(field: &str, value: Option<f64>) -> Result<(), AppError> {
    match value {
        Some(v) if v <= 0.0 || !v.is_finite() => {
            Err(AppError::Validation(format!("{field} must be positive")))
        }
        _ => Ok(()),
    }
}
