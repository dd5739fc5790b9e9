use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{document::PlanSource, review::PlanStatus};

/// A generated plan and its review state.
#[derive(Debug, Clone, Serialize)]
pub struct PlanRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub nutritionist_id: Option<Uuid>,
    pub title: String,
    pub goal: Option<String>,
    pub budget_per_meal: f64,
    pub dietary_restrictions: Option<String>,
    pub plan_data: Value,
    pub source: PlanSource,
    pub status: PlanStatus,
    pub nutritionist_feedback: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub validated_at: Option<OffsetDateTime>,
}

impl PlanRecord {
    pub fn new_pending(
        user_id: Uuid,
        title: String,
        goal: Option<String>,
        budget_per_meal: f64,
        dietary_restrictions: Option<String>,
        plan_data: Value,
        source: PlanSource,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            nutritionist_id: None,
            title,
            goal,
            budget_per_meal,
            dietary_restrictions,
            plan_data,
            source,
            status: PlanStatus::Pending,
            nutritionist_feedback: None,
            created_at: OffsetDateTime::now_utc(),
            validated_at: None,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct PlanRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub nutritionist_id: Option<Uuid>,
    pub title: String,
    pub goal: Option<String>,
    pub budget_per_meal: f64,
    pub dietary_restrictions: Option<String>,
    pub plan_data: Value,
    pub source: String,
    pub status: String,
    pub nutritionist_feedback: Option<String>,
    pub created_at: OffsetDateTime,
    pub validated_at: Option<OffsetDateTime>,
}

impl TryFrom<PlanRow> for PlanRecord {
    type Error = anyhow::Error;

    fn try_from(r: PlanRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            user_id: r.user_id,
            nutritionist_id: r.nutritionist_id,
            title: r.title,
            goal: r.goal,
            budget_per_meal: r.budget_per_meal,
            dietary_restrictions: r.dietary_restrictions,
            plan_data: r.plan_data,
            source: r.source.parse()?,
            status: r.status.parse()?,
            nutritionist_feedback: r.nutritionist_feedback,
            created_at: r.created_at,
            validated_at: r.validated_at,
        })
    }
}

/// Review counters for one nutritionist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow, Serialize)]
pub struct ReviewerStats {
    pub validated: i64,
    pub approved: i64,
    pub rejected: i64,
    pub unique_patients: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow, Serialize)]
pub struct PlanCounts {
    pub total: i64,
    pub pending: i64,
}
