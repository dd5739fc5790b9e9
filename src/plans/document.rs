use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::context::PlanContext;
use crate::metabolism::round_to;

/// Which branch of plan assembly produced a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanSource {
    Structured,
    DegradedText,
    Fallback,
}

impl PlanSource {
    pub fn as_str(self) -> &'static str {
        match self {
            PlanSource::Structured => "structured",
            PlanSource::DegradedText => "degraded_text",
            PlanSource::Fallback => "fallback",
        }
    }
}

impl FromStr for PlanSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "structured" => Ok(PlanSource::Structured),
            "degraded_text" => Ok(PlanSource::DegradedText),
            "fallback" => Ok(PlanSource::Fallback),
            other => anyhow::bail!("unknown plan source: {other}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ingredient {
    pub item: &'static str,
    pub quantity: &'static str,
    pub price: f64,
    pub calories: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Meal {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ingredients: Vec<Ingredient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub total_calories: f64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotals {
    pub total_calories: f64,
    pub total_cost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein_g: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbs_g: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fat_g: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingItem {
    pub item: &'static str,
    pub quantity: &'static str,
    pub estimated_price: f64,
}

/// Plan built from a generator reply that was not usable JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DegradedPlan {
    pub plan_type: &'static str,
    pub breakfast: Meal,
    pub lunch: Meal,
    pub dinner: Meal,
    pub daily_totals: DailyTotals,
    pub ai_response_text: String,
    pub note: &'static str,
    pub degraded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionistNotes {
    pub metabolic_analysis: String,
    pub budget_compliance: String,
    pub goal_alignment: String,
    pub note: &'static str,
}

/// Deterministic plan used when no generator output is available.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FallbackPlan {
    pub plan_type: &'static str,
    pub breakfast: Meal,
    pub lunch: Meal,
    pub dinner: Meal,
    pub daily_totals: DailyTotals,
    pub shopping_list: Vec<ShoppingItem>,
    pub nutritionist_notes: NutritionistNotes,
    pub fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PlanDocument {
    Structured(Value),
    DegradedText(DegradedPlan),
    Fallback(FallbackPlan),
}

impl PlanDocument {
    pub fn source(&self) -> PlanSource {
        match self {
            PlanDocument::Structured(_) => PlanSource::Structured,
            PlanDocument::DegradedText(_) => PlanSource::DegradedText,
            PlanDocument::Fallback(_) => PlanSource::Fallback,
        }
    }

    /// JSON persisted as the plan's `plan_data`.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        match self {
            PlanDocument::Structured(v) => Ok(v.clone()),
            other => serde_json::to_value(other),
        }
    }
}

/// Removes a surrounding Markdown code fence (```json ... ```), if any.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop the info string ("json", "JSON", ...) up to the first newline
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Turns raw generator text into a plan document. Only an object carrying
/// breakfast, lunch and dinner objects is accepted as structured.
pub fn interpret_response(raw: &str, ctx: &PlanContext) -> PlanDocument {
    let body = strip_code_fences(raw);
    match serde_json::from_str::<Value>(body) {
        Ok(value) if has_meal_slots(&value) => {
            debug!("generator reply accepted as structured plan");
            PlanDocument::Structured(value)
        }
        Ok(_) => {
            warn!("generator reply is JSON but lacks meal slots; degrading");
            PlanDocument::DegradedText(degraded_plan(raw, ctx))
        }
        Err(e) => {
            warn!(error = %e, "generator reply is not JSON; degrading");
            PlanDocument::DegradedText(degraded_plan(raw, ctx))
        }
    }
}

fn has_meal_slots(value: &Value) -> bool {
    ["breakfast", "lunch", "dinner"]
        .iter()
        .all(|slot| value.get(slot).is_some_and(Value::is_object))
}

// Calorie share and cost multiplier (of budget) per meal slot.
const DEGRADED_SPLIT: [(&str, f64, f64); 3] = [
    ("Balanced breakfast", 0.25, 0.6),
    ("Nutritious lunch", 0.40, 1.0),
    ("Light dinner", 0.35, 0.8),
];

fn degraded_plan(raw: &str, ctx: &PlanContext) -> DegradedPlan {
    let target = ctx.metrics.target_calories.unwrap_or(0.0);
    let budget = ctx.budget_per_meal;
    let [breakfast, lunch, dinner] = DEGRADED_SPLIT.map(|(name, share, cost)| Meal {
        name: name.to_string(),
        ingredients: Vec::new(),
        description: Some("Based on the generator's text reply".to_string()),
        total_calories: round_to(target * share, 2),
        total_cost: round_to(budget * cost, 2),
    });
    let macros = ctx.metrics.macros;
    let daily_totals = DailyTotals {
        total_calories: round_to(
            breakfast.total_calories + lunch.total_calories + dinner.total_calories,
            2,
        ),
        total_cost: round_to(breakfast.total_cost + lunch.total_cost + dinner.total_cost, 2),
        protein_g: macros.map(|m| m.protein_g),
        carbs_g: macros.map(|m| m.carbs_g),
        fat_g: macros.map(|m| m.fat_g),
    };
    DegradedPlan {
        plan_type: ctx.goal_class().plan_type(),
        breakfast,
        lunch,
        dinner,
        daily_totals,
        ai_response_text: raw.to_string(),
        note: "Plan derived from the generator's text reply",
        degraded: true,
    }
}
