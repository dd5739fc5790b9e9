use serde::{Deserialize, Serialize};

// Matched as lowercase substrings; the lose set is checked first.
const LOSE_KEYWORDS: &[&str] = &["perder", "emagrec", "lose", "weight loss", "slim"];
const GAIN_KEYWORDS: &[&str] = &["ganhar", "massa", "gain", "bulk", "hipertrofia"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalClass {
    Lose,
    Gain,
    Maintain,
}

/// Share of calories per macronutrient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacroRatios {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl GoalClass {
    pub fn classify(goal: Option<&str>) -> Self {
        let Some(goal) = goal.map(str::to_lowercase) else {
            return GoalClass::Maintain;
        };
        if LOSE_KEYWORDS.iter().any(|k| goal.contains(k)) {
            GoalClass::Lose
        } else if GAIN_KEYWORDS.iter().any(|k| goal.contains(k)) {
            GoalClass::Gain
        } else {
            GoalClass::Maintain
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GoalClass::Lose => "weight loss",
            GoalClass::Gain => "muscle gain",
            GoalClass::Maintain => "maintenance",
        }
    }

    /// Title used for plans generated for this goal.
    pub fn plan_type(self) -> &'static str {
        match self {
            GoalClass::Lose => "Weight Loss Plan",
            GoalClass::Gain => "Muscle Gain Plan",
            GoalClass::Maintain => "Balanced Plan",
        }
    }

    pub fn calorie_factor(self) -> f64 {
        match self {
            GoalClass::Lose => 0.85,
            GoalClass::Gain => 1.15,
            GoalClass::Maintain => 1.0,
        }
    }

    pub fn macro_ratios(self) -> MacroRatios {
        match self {
            GoalClass::Lose => MacroRatios {
                protein: 0.30,
                carbs: 0.40,
                fat: 0.30,
            },
            GoalClass::Gain => MacroRatios {
                protein: 0.25,
                carbs: 0.50,
                fat: 0.25,
            },
            GoalClass::Maintain => MacroRatios {
                protein: 0.25,
                carbs: 0.45,
                fat: 0.30,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_is_case_insensitive_substring() {
        assert_eq!(GoalClass::classify(Some("Quero Perder peso")), GoalClass::Lose);
        assert_eq!(GoalClass::classify(Some("perder peso")), GoalClass::Lose);
        assert_eq!(GoalClass::classify(Some("perder_peso")), GoalClass::Lose);
        assert_eq!(GoalClass::classify(Some("EMAGRECER")), GoalClass::Lose);
        assert_eq!(GoalClass::classify(Some("ganhar massa")), GoalClass::Gain);
        assert_eq!(GoalClass::classify(Some("Gain muscle")), GoalClass::Gain);
    }

    #[test]
    fn empty_or_absent_goal_is_maintenance() {
        assert_eq!(GoalClass::classify(None), GoalClass::Maintain);
        assert_eq!(GoalClass::classify(Some("")), GoalClass::Maintain);
        assert_eq!(GoalClass::classify(Some("manter peso")), GoalClass::Maintain);
    }

    #[test]
    fn ratios_sum_to_one_for_every_class() {
        for class in [GoalClass::Lose, GoalClass::Gain, GoalClass::Maintain] {
            let r = class.macro_ratios();
            assert!((r.protein + r.carbs + r.fat - 1.0).abs() < 1e-9, "{class:?}");
        }
    }

    #[test]
    fn ratio_triples_are_distinct() {
        let lose = GoalClass::Lose.macro_ratios();
        let gain = GoalClass::Gain.macro_ratios();
        let keep = GoalClass::Maintain.macro_ratios();
        assert_ne!(lose, gain);
        assert_ne!(gain, keep);
        assert_ne!(lose, keep);
    }
}
