use std::fmt::Write;

use super::context::PlanContext;

const SYSTEM_INSTRUCTION: &str = "You are a registered dietitian specialised in evidence-based \
nutrition. You design personalised, affordable meal plans and always answer with a single \
JSON object, without commentary or Markdown.";

/// Prompt text plus system instruction sent to the plan generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPayload {
    pub system: String,
    pub prompt: String,
}

pub fn build_request(ctx: &PlanContext) -> PromptPayload {
    PromptPayload {
        system: SYSTEM_INSTRUCTION.to_string(),
        prompt: render_prompt(ctx),
    }
}

fn render_prompt(ctx: &PlanContext) -> String {
    let m = &ctx.metrics;
    let budget = ctx.budget_per_meal;
    let mut out = String::with_capacity(4096);

    out.push_str(
        "Create a personalised daily meal plan based on the full analysis of this patient.\n\n",
    );

    out.push_str("PATIENT\n");
    line(&mut out, "Name", Some(&ctx.name));
    line(&mut out, "Age (years)", ctx.age);
    line(&mut out, "Weight (kg)", ctx.weight_kg);
    line(&mut out, "Height (cm)", ctx.height_cm);
    line(&mut out, "Goal", Some(ctx.goal_text()));
    line(&mut out, "Budget per meal", Some(format!("{budget:.2}")));
    line(
        &mut out,
        "Dietary restrictions",
        Some(ctx.dietary_restrictions.as_deref().unwrap_or("none")),
    );
    if let Some(dislikes) = &ctx.food_dislikes {
        line(&mut out, "Food dislikes", Some(dislikes));
    }

    out.push_str("\nMETABOLIC ANALYSIS\n");
    line(&mut out, "BMR (kcal)", m.bmr);
    line(&mut out, "TDEE (kcal)", m.tdee);
    line(&mut out, "Daily calorie target (kcal)", m.target_calories);
    if let Some(macros) = &m.macros {
        line(
            &mut out,
            "Macros",
            Some(format!(
                "protein {}g, carbs {}g, fat {}g",
                macros.protein_g, macros.carbs_g, macros.fat_g
            )),
        );
    }
    line(&mut out, "Goal class", Some(m.goal_class.label()));

    out.push_str("\nLIFESTYLE\n");
    line(&mut out, "Sleep (hours)", ctx.lifestyle.sleep_hours);
    line(&mut out, "Stress level (1-10)", ctx.lifestyle.stress_level);
    line(&mut out, "Exercise per week", ctx.exercise_sessions.as_deref());
    line(&mut out, "Water (glasses/day)", ctx.water_intake);

    out.push_str("\nFAMILY HISTORY\n");
    let conditions = if ctx.family_conditions.is_empty() {
        "none".to_string()
    } else {
        ctx.family_conditions.join(", ")
    };
    line(&mut out, "Conditions", Some(conditions));

    let _ = write!(
        out,
        r#"
INSTRUCTIONS
1. Strictly respect the budget of {budget:.2} per meal.
2. Use realistic local market prices.
3. Take the family history into account for prevention.
4. Match the calculated metabolic needs.
5. Provide breakfast, lunch, dinner and snacks, each with itemised ingredients
   (quantity, price, calories, macros), preparation and timing.
6. Include a shopping list with estimated prices.

RESPONSE FORMAT (JSON)
{{
  "breakfast": {{"name": "", "ingredients": [{{"item": "", "quantity": "", "price": 0.0, "calories": 0, "protein": 0, "carbs": 0, "fat": 0}}], "preparation": "", "total_calories": 0, "total_cost": 0.0, "macros": {{"protein": 0, "carbs": 0, "fat": 0}}, "timing": ""}},
  "lunch": {{ same shape as breakfast }},
  "dinner": {{ same shape as breakfast }},
  "snacks": [{{ same shape as breakfast }}],
  "daily_totals": {{"total_calories": {calories}, "total_cost": 0.0, "protein_g": 0, "carbs_g": 0, "fat_g": 0, "fiber_g": 0, "sodium_mg": 0}},
  "shopping_list": [{{"item": "", "quantity": "", "estimated_price": 0.0, "where_to_buy": ""}}],
  "nutritionist_notes": {{"metabolic_analysis": "", "family_prevention": "", "lifestyle_adaptations": "", "supplement_recommendations": "", "monitoring_tips": ""}},
  "scientific_rationale": {{"caloric_distribution": "", "macro_rationale": "", "timing_science": "", "ingredient_selection": ""}}
}}
"#,
        calories = m
            .target_calories
            .map(|c| c.to_string())
            .unwrap_or_else(|| "0".into()),
    );

    out
}

fn line(out: &mut String, label: &str, value: Option<impl std::fmt::Display>) {
    match value {
        Some(v) => {
            let _ = writeln!(out, "- {label}: {v}");
        }
        None => {
            let _ = writeln!(out, "- {label}: not informed");
        }
    }
}
