use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::metabolism::ExerciseFrequency;

/// Who the account belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    User,
    Nutritionist,
}

impl AccountType {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountType::User => "user",
            AccountType::Nutritionist => "nutritionist",
        }
    }
}

impl FromStr for AccountType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(AccountType::User),
            "nutritionist" => Ok(AccountType::Nutritionist),
            other => anyhow::bail!("unknown account type {other:?}"),
        }
    }
}

/// Selects the BMR coefficients. Unset profiles use the male branch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

impl FromStr for Sex {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Sex::Male),
            "female" => Ok(Sex::Female),
            other => anyhow::bail!("unknown sex {other:?}"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BodyMeasurements {
    pub waist_cm: Option<f64>,
    pub weight_6mo_ago: Option<f64>,
    pub target_weight: Option<f64>,
    pub weight_variation_pattern: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EatingBehavior {
    pub meal_times: Option<String>,
    pub eating_speed: Option<String>,
    pub snack_frequency: Option<String>,
    pub water_intake: Option<i32>, // glasses per day
    pub alcohol_use: Option<String>,
    pub food_dislikes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Lifestyle {
    pub sleep_hours: Option<f64>,
    pub sleep_quality: Option<String>,
    pub stress_level: Option<i32>, // 1-10
    pub work_routine: Option<String>,
    pub work_schedule: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FamilyHistory {
    pub diabetes: bool,
    pub hypertension: bool,
    pub obesity: bool,
    pub heart_disease: bool,
}

impl FamilyHistory {
    /// Names of the flagged conditions, in a fixed order.
    pub fn conditions(&self) -> Vec<&'static str> {
        [
            (self.diabetes, "diabetes"),
            (self.hypertension, "hypertension"),
            (self.obesity, "obesity"),
            (self.heart_disease, "heart disease"),
        ]
        .into_iter()
        .filter_map(|(flag, name)| flag.then_some(name))
        .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Activity {
    pub current_exercise: Option<String>,
    pub exercise_frequency: Option<ExerciseFrequency>,
    pub duration_min: Option<i32>,
    pub intensity: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Medications {
    pub current_medications: Option<String>,
    pub supplements: Option<String>,
    pub schedule: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SelfAssessment {
    pub energy_level: Option<i32>,      // 1-10
    pub disposition_level: Option<i32>, // 1-10
    pub digestive_issues: Option<String>,
    pub bloating_frequency: Option<String>,
    pub hunger_pattern: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GoalDetails {
    pub monthly_weight_goal: Option<f64>,
    pub timeframe_months: Option<i32>,
    pub motivation: Option<String>,
    pub previous_diet_experience: Option<String>,
}

/// A user or nutritionist account together with its health questionnaire.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // argon2, never exposed
    pub name: String,
    pub account_type: AccountType,
    pub sex: Option<Sex>,
    pub age: Option<i32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub goal: Option<String>,
    pub budget_per_meal: Option<f64>,
    pub dietary_restrictions: Option<String>,
    pub body: BodyMeasurements,
    pub behavior: EatingBehavior,
    pub lifestyle: Lifestyle,
    pub family_history: FamilyHistory,
    pub activity: Activity,
    pub medications: Medications,
    pub self_assessment: SelfAssessment,
    pub goal_details: GoalDetails,
    pub license_number: Option<String>,
    pub specialization: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Profile {
    /// Fresh profile with every questionnaire field unset.
    pub fn new(email: &str, password_hash: &str, name: &str, account_type: AccountType) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            name: name.to_string(),
            account_type,
            sex: None,
            age: None,
            weight_kg: None,
            height_cm: None,
            goal: None,
            budget_per_meal: None,
            dietary_restrictions: None,
            body: BodyMeasurements::default(),
            behavior: EatingBehavior::default(),
            lifestyle: Lifestyle::default(),
            family_history: FamilyHistory::default(),
            activity: Activity::default(),
            medications: Medications::default(),
            self_assessment: SelfAssessment::default(),
            goal_details: GoalDetails::default(),
            license_number: None,
            specialization: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_nutritionist(&self) -> bool {
        self.account_type == AccountType::Nutritionist
    }
}

/// Row as stored in `profiles`; questionnaire groups live in JSONB columns.
#[derive(Debug, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub account_type: String,
    pub sex: Option<String>,
    pub age: Option<i32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub goal: Option<String>,
    pub budget_per_meal: Option<f64>,
    pub dietary_restrictions: Option<String>,
    pub body: Json<BodyMeasurements>,
    pub behavior: Json<EatingBehavior>,
    pub lifestyle: Json<Lifestyle>,
    pub family_history: Json<FamilyHistory>,
    pub activity: Json<Activity>,
    pub medications: Json<Medications>,
    pub self_assessment: Json<SelfAssessment>,
    pub goal_details: Json<GoalDetails>,
    pub license_number: Option<String>,
    pub specialization: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = anyhow::Error;

    fn try_from(r: ProfileRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            email: r.email,
            password_hash: r.password_hash,
            name: r.name,
            account_type: r.account_type.parse()?,
            sex: r.sex.as_deref().map(str::parse).transpose()?,
            age: r.age,
            weight_kg: r.weight_kg,
            height_cm: r.height_cm,
            goal: r.goal,
            budget_per_meal: r.budget_per_meal,
            dietary_restrictions: r.dietary_restrictions,
            body: r.body.0,
            behavior: r.behavior.0,
            lifestyle: r.lifestyle.0,
            family_history: r.family_history.0,
            activity: r.activity.0,
            medications: r.medications.0,
            self_assessment: r.self_assessment.0,
            goal_details: r.goal_details.0,
            license_number: r.license_number,
            specialization: r.specialization,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}
