use super::{
    context::PlanContext,
    document::{
        DailyTotals, FallbackPlan, Ingredient, Meal, NutritionistNotes, PlanDocument, ShoppingItem,
    },
};
use crate::metabolism::{round_to, GoalClass};

const DEFAULT_PROTEIN_G: f64 = 120.0;
const DEFAULT_CARBS_G: f64 = 180.0;
const DEFAULT_FAT_G: f64 = 60.0;

fn ingredient(item: &'static str, quantity: &'static str, price: f64, calories: u32) -> Ingredient {
    Ingredient {
        item,
        quantity,
        price,
        calories,
    }
}

fn meal(name: &str, ingredients: Vec<Ingredient>, total_calories: f64, total_cost: f64) -> Meal {
    Meal {
        name: name.to_string(),
        ingredients,
        description: None,
        total_calories,
        total_cost,
    }
}

fn breakfast_for(goal: GoalClass) -> Meal {
    match goal {
        GoalClass::Lose => meal(
            "Green smoothie",
            vec![
                ingredient("Spinach", "50g", 1.50, 12),
                ingredient("Banana", "1 unit", 1.00, 105),
                ingredient("Protein powder", "30g", 4.00, 120),
            ],
            237.0,
            6.50,
        ),
        GoalClass::Gain => meal(
            "Eggs with oats",
            vec![
                ingredient("Eggs", "3 units", 3.00, 210),
                ingredient("Rolled oats", "50g", 2.00, 190),
                ingredient("Banana", "1 unit", 1.00, 105),
            ],
            505.0,
            6.00,
        ),
        GoalClass::Maintain => meal(
            "Balanced breakfast",
            vec![
                ingredient("Wholegrain bread", "2 slices", 2.00, 160),
                ingredient("White cheese", "30g", 2.50, 75),
                ingredient("Tomato", "1 unit", 1.00, 20),
            ],
            255.0,
            5.50,
        ),
    }
}

fn lunch() -> Meal {
    meal(
        "Grilled chicken with quinoa",
        vec![
            ingredient("Chicken breast", "150g", 12.00, 248),
            ingredient("Quinoa", "50g", 4.00, 185),
            ingredient("Broccoli", "100g", 3.00, 34),
        ],
        467.0,
        19.00,
    )
}

fn dinner() -> Meal {
    meal(
        "Salmon with vegetables",
        vec![
            ingredient("Salmon", "120g", 15.00, 250),
            ingredient("Sweet potato", "100g", 2.00, 86),
            ingredient("Asparagus", "100g", 4.00, 20),
        ],
        356.0,
        21.00,
    )
}

fn shopping_list() -> Vec<ShoppingItem> {
    [
        ("Chicken breast", "1kg", 18.00),
        ("Salmon", "500g", 35.00),
        ("Quinoa", "500g", 12.00),
        ("Assorted vegetables", "2kg", 15.00),
    ]
    .into_iter()
    .map(|(item, quantity, estimated_price)| ShoppingItem {
        item,
        quantity,
        estimated_price,
    })
    .collect()
}

/// Fixed plan chosen by goal class. Pure: no randomness, no I/O.
pub fn fallback_plan(ctx: &PlanContext) -> PlanDocument {
    let goal = ctx.goal_class();
    let (breakfast, lunch, dinner) = (breakfast_for(goal), lunch(), dinner());
    let macros = ctx.metrics.macros;

    let daily_totals = DailyTotals {
        total_calories: breakfast.total_calories + lunch.total_calories + dinner.total_calories,
        total_cost: round_to(breakfast.total_cost + lunch.total_cost + dinner.total_cost, 2),
        protein_g: Some(macros.map_or(DEFAULT_PROTEIN_G, |m| m.protein_g)),
        carbs_g: Some(macros.map_or(DEFAULT_CARBS_G, |m| m.carbs_g)),
        fat_g: Some(macros.map_or(DEFAULT_FAT_G, |m| m.fat_g)),
    };

    let metabolic_analysis = match ctx.metrics.target_calories {
        Some(kcal) => format!("Plan built around {kcal} kcal per day"),
        None => "Daily calorie target unavailable; complete the profile".to_string(),
    };

    PlanDocument::Fallback(FallbackPlan {
        plan_type: goal.plan_type(),
        breakfast,
        lunch,
        dinner,
        daily_totals,
        shopping_list: shopping_list(),
        nutritionist_notes: NutritionistNotes {
            metabolic_analysis,
            budget_compliance: format!(
                "Respecting a budget of {:.2} per meal",
                ctx.budget_per_meal
            ),
            goal_alignment: format!("Suited to: {}", ctx.goal_text()),
            note: "Automatically generated plan; configure GEMINI_API_KEY for personalised plans",
        },
        fallback: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plans::document::PlanSource;
    use crate::profiles::{AccountType, Profile};

    fn ctx_with_goal(goal: Option<&str>) -> PlanContext {
        let mut p = Profile::new("x@y.co", "h", "X", AccountType::User);
        p.goal = goal.map(str::to_string);
        PlanContext::from_profile(&p)
    }

    fn unwrap_fallback(doc: PlanDocument) -> FallbackPlan {
        match doc {
            PlanDocument::Fallback(plan) => plan,
            other => panic!("expected fallback, got {:?}", other.source()),
        }
    }

    #[test]
    fn breakfast_depends_on_goal() {
        let lose = unwrap_fallback(fallback_plan(&ctx_with_goal(Some("Quero perder peso"))));
        let gain = unwrap_fallback(fallback_plan(&ctx_with_goal(Some("ganhar massa"))));
        let keep = unwrap_fallback(fallback_plan(&ctx_with_goal(None)));

        assert_eq!(lose.breakfast.total_calories, 237.0);
        assert_eq!(gain.breakfast.total_calories, 505.0);
        assert_eq!(keep.breakfast.total_calories, 255.0);
        assert_eq!(gain.plan_type, "Muscle Gain Plan");
        assert_eq!(lose.lunch, gain.lunch);
        assert_eq!(lose.dinner, keep.dinner);
    }

    #[test]
    fn totals_sum_the_three_meals() {
        let plan = unwrap_fallback(fallback_plan(&ctx_with_goal(Some("ganhar massa"))));
        assert_eq!(plan.daily_totals.total_calories, 505.0 + 467.0 + 356.0);
        assert_eq!(plan.daily_totals.total_cost, 46.0);
    }

    #[test]
    fn macros_default_when_not_computable() {
        let plan = unwrap_fallback(fallback_plan(&ctx_with_goal(None)));
        assert_eq!(plan.daily_totals.protein_g, Some(DEFAULT_PROTEIN_G));
        assert_eq!(plan.daily_totals.carbs_g, Some(DEFAULT_CARBS_G));
        assert_eq!(plan.daily_totals.fat_g, Some(DEFAULT_FAT_G));
    }

    #[test]
    fn output_is_deterministic() {
        let ctx = ctx_with_goal(Some("perder peso"));
        let a = fallback_plan(&ctx).to_value().unwrap();
        let b = fallback_plan(&ctx).to_value().unwrap();
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
        assert_eq!(a["fallback"], true);
        assert_eq!(fallback_plan(&ctx).source(), PlanSource::Fallback);
        assert_eq!(a["shopping_list"].as_array().map(Vec::len), Some(4));
    }
}
