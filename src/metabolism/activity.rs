use serde::{Deserialize, Serialize};

/// Exercise frequency as entered by the user: either a weekly session count
/// (fractions allowed, e.g. 2.5 sessions a week) or a category label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExerciseFrequency {
    WeeklyCount(f64),
    Label(String),
}

impl std::fmt::Display for ExerciseFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExerciseFrequency::WeeklyCount(n) => write!(f, "{n}"),
            ExerciseFrequency::Label(label) => f.write_str(label),
        }
    }
}

/// Activity bucket used to pick the TDEE multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    #[serde(rename = "none")]
    Inactive,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl ActivityLevel {
    pub fn factor(self) -> f64 {
        match self {
            ActivityLevel::Inactive => 1.20,
            ActivityLevel::Low => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::High => 1.725,
            ActivityLevel::VeryHigh => 1.90,
        }
    }

    /// Buckets by whole sessions; negative or non-finite counts are inactive.
    pub fn from_weekly_count(sessions: f64) -> Self {
        if !sessions.is_finite() || sessions < 1.0 {
            return ActivityLevel::Inactive;
        }
        match sessions.floor() as u32 {
            1..=2 => ActivityLevel::Low,
            3..=4 => ActivityLevel::Moderate,
            5..=6 => ActivityLevel::High,
            _ => ActivityLevel::VeryHigh,
        }
    }

    /// Accepts English bucket names and the Portuguese labels used by the
    /// questionnaire. Numeric strings are treated as weekly counts.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_lowercase();
        if let Ok(n) = label.parse::<f64>() {
            return Self::from_weekly_count(n);
        }
        match label.replace([' ', '-'], "_").as_str() {
            "low" | "light" | "leve" => ActivityLevel::Low,
            "moderate" | "moderado" => ActivityLevel::Moderate,
            "high" | "intense" | "intenso" => ActivityLevel::High,
            "very_high" | "very_intense" | "muito_intenso" => ActivityLevel::VeryHigh,
            _ => ActivityLevel::Inactive,
        }
    }

    pub fn from_frequency(freq: Option<&ExerciseFrequency>) -> Self {
        match freq {
            Some(ExerciseFrequency::WeeklyCount(n)) => Self::from_weekly_count(*n),
            Some(ExerciseFrequency::Label(label)) => Self::from_label(label),
            None => ActivityLevel::Inactive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekly_counts_bucket_monotonically() {
        let factors: Vec<f64> = [0.0, 2.0, 4.0, 6.0, 8.0]
            .into_iter()
            .map(|n| ActivityLevel::from_weekly_count(n).factor())
            .collect();
        assert_eq!(factors, vec![1.20, 1.375, 1.55, 1.725, 1.90]);
    }

    #[test]
    fn bucket_edges() {
        assert_eq!(ActivityLevel::from_weekly_count(1.0), ActivityLevel::Low);
        assert_eq!(ActivityLevel::from_weekly_count(3.0), ActivityLevel::Moderate);
        assert_eq!(ActivityLevel::from_weekly_count(5.0), ActivityLevel::High);
        assert_eq!(ActivityLevel::from_weekly_count(7.0), ActivityLevel::VeryHigh);
    }

    #[test]
    fn fractional_counts_round_down() {
        assert_eq!(ActivityLevel::from_weekly_count(0.5), ActivityLevel::Inactive);
        assert_eq!(ActivityLevel::from_weekly_count(2.5), ActivityLevel::Low);
        assert_eq!(ActivityLevel::from_weekly_count(4.9), ActivityLevel::Moderate);
        assert_eq!(ActivityLevel::from_weekly_count(-2.0), ActivityLevel::Inactive);
        assert_eq!(ActivityLevel::from_label("3.5"), ActivityLevel::Moderate);

        let f: ExerciseFrequency = serde_json::from_str("2.5").unwrap();
        assert_eq!(f, ExerciseFrequency::WeeklyCount(2.5));
        assert_eq!(f.to_string(), "2.5");
    }

    #[test]
    fn labels_in_both_languages() {
        assert_eq!(ActivityLevel::from_label("sedentario"), ActivityLevel::Inactive);
        assert_eq!(ActivityLevel::from_label("Leve"), ActivityLevel::Low);
        assert_eq!(ActivityLevel::from_label("moderate"), ActivityLevel::Moderate);
        assert_eq!(ActivityLevel::from_label("muito_intenso"), ActivityLevel::VeryHigh);
        assert_eq!(ActivityLevel::from_label("very high"), ActivityLevel::VeryHigh);
        assert_eq!(ActivityLevel::from_label("4"), ActivityLevel::Moderate);
    }

    #[test]
    fn missing_or_unknown_defaults_to_inactive() {
        assert_eq!(ActivityLevel::from_frequency(None), ActivityLevel::Inactive);
        assert_eq!(ActivityLevel::from_label("sometimes"), ActivityLevel::Inactive);
        assert_eq!(ActivityLevel::from_label(""), ActivityLevel::Inactive);
    }

    #[test]
    fn frequency_accepts_number_or_string() {
        let n: ExerciseFrequency = serde_json::from_str("3").unwrap();
        assert_eq!(n, ExerciseFrequency::WeeklyCount(3.0));
        let s: ExerciseFrequency = serde_json::from_str("\"intenso\"").unwrap();
        assert_eq!(ActivityLevel::from_frequency(Some(&s)), ActivityLevel::High);
    }
}
