use serde::{Deserialize, Serialize};

use super::repo_types::{PlanRecord, ReviewerStats};
use crate::{
    metabolism::MetabolicSnapshot,
    profiles::{Activity, FamilyHistory, Lifestyle, Profile, SelfAssessment, Sex},
};

#[derive(Debug, Serialize)]
pub struct GeneratePlanResponse {
    pub plan: PlanRecord,
    pub metrics: MetabolicSnapshot,
    pub ai_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct MyPlansResponse {
    pub plans: Vec<PlanRecord>,
    pub metrics: MetabolicSnapshot,
}

#[derive(Debug, Serialize)]
pub struct PendingPlansResponse {
    pub plans: Vec<PlanRecord>,
    pub stats: ReviewerStats,
}

/// Plan owner's data shown to nutritionists next to the plan.
#[derive(Debug, Serialize)]
pub struct OwnerAnalysis {
    pub name: String,
    pub email: String,
    pub sex: Option<Sex>,
    pub age: Option<i32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub goal: Option<String>,
    pub metrics: MetabolicSnapshot,
    pub lifestyle: Lifestyle,
    pub activity: Activity,
    pub family_history: FamilyHistory,
    pub self_assessment: SelfAssessment,
}

impl From<&Profile> for OwnerAnalysis {
    fn from(p: &Profile) -> Self {
        Self {
            name: p.name.clone(),
            email: p.email.clone(),
            sex: p.sex,
            age: p.age,
            weight_kg: p.weight_kg,
            height_cm: p.height_cm,
            goal: p.goal.clone(),
            metrics: MetabolicSnapshot::of(p),
            lifestyle: p.lifestyle.clone(),
            activity: p.activity.clone(),
            family_history: p.family_history,
            self_assessment: p.self_assessment.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlanDetailsResponse {
    pub plan: PlanRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerAnalysis>,
}

#[derive(Debug, Deserialize)]
pub struct ValidatePlanRequest {
    pub action: String,
    pub feedback: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub total_plans: i64,
    pub pending_plans: i64,
    pub my_validations: i64,
    pub my_approvals: i64,
    pub my_rejections: i64,
    pub approval_rate: f64,
    pub unique_patients: i64,
    pub recent_pending: Vec<PlanRecord>,
}
