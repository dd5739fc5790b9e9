use serde::Serialize;

use super::{ActivityLevel, GoalClass, MetabolicError};
use crate::profiles::{Profile, Sex};

const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARBS: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacroSplit {
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub total_calories: f64,
}

/// All derived values for one profile; `None` where not computable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetabolicSnapshot {
    pub bmr: Option<f64>,
    pub tdee: Option<f64>,
    pub target_calories: Option<f64>,
    pub macros: Option<MacroSplit>,
    pub activity_level: ActivityLevel,
    pub goal_class: GoalClass,
}

impl MetabolicSnapshot {
    pub fn of(profile: &Profile) -> Self {
        Self {
            bmr: basal_metabolic_rate(profile).ok(),
            tdee: total_daily_energy_expenditure(profile).ok(),
            target_calories: target_calories(profile).ok(),
            macros: macro_split(profile).ok(),
            activity_level: ActivityLevel::from_frequency(
                profile.activity.exercise_frequency.as_ref(),
            ),
            goal_class: GoalClass::classify(profile.goal.as_deref()),
        }
    }
}

/// Harris-Benedict (revised) resting energy expenditure, kcal/day.
pub fn basal_metabolic_rate(profile: &Profile) -> Result<f64, MetabolicError> {
    let (weight, height, age) = body_inputs(profile)?;
    let bmr = match profile.sex {
        Some(Sex::Female) => 447.593 + 9.247 * weight + 3.098 * height - 4.330 * age,
        Some(Sex::Male) | None => 88.362 + 13.397 * weight + 4.799 * height - 5.677 * age,
    };
    Ok(round_to(bmr, 2))
}

pub fn total_daily_energy_expenditure(profile: &Profile) -> Result<f64, MetabolicError> {
    let bmr = basal_metabolic_rate(profile)?;
    let level = ActivityLevel::from_frequency(profile.activity.exercise_frequency.as_ref());
    Ok(round_to(bmr * level.factor(), 2))
}

pub fn target_calories(profile: &Profile) -> Result<f64, MetabolicError> {
    let tdee = total_daily_energy_expenditure(profile)?;
    let class = GoalClass::classify(profile.goal.as_deref());
    Ok(round_to(tdee * class.calorie_factor(), 2))
}

pub fn macro_split(profile: &Profile) -> Result<MacroSplit, MetabolicError> {
    let calories = target_calories(profile)?;
    let ratios = GoalClass::classify(profile.goal.as_deref()).macro_ratios();
    Ok(MacroSplit {
        protein_g: round_to(calories * ratios.protein / KCAL_PER_G_PROTEIN, 1),
        carbs_g: round_to(calories * ratios.carbs / KCAL_PER_G_CARBS, 1),
        fat_g: round_to(calories * ratios.fat / KCAL_PER_G_FAT, 1),
        total_calories: calories,
    })
}

// Zero or negative values are treated the same as missing ones.
fn body_inputs(profile: &Profile) -> Result<(f64, f64, f64), MetabolicError> {
    let weight = profile.weight_kg.filter(|w| *w > 0.0);
    let height = profile.height_cm.filter(|h| *h > 0.0);
    let age = profile.age.filter(|a| *a > 0).map(f64::from);

    match (weight, height, age) {
        (Some(w), Some(h), Some(a)) => Ok((w, h, a)),
        _ => {
            let missing = [
                (weight.is_none(), "weight_kg"),
                (height.is_none(), "height_cm"),
                (age.is_none(), "age"),
            ]
            .into_iter()
            .filter_map(|(absent, name)| absent.then_some(name))
            .collect();
            Err(MetabolicError::IncompleteProfile { missing })
        }
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
