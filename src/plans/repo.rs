use anyhow::Context;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{
    repo_types::{PlanCounts, PlanRecord, PlanRow, ReviewerStats},
    review::PlanStatus,
};

const PLAN_COLUMNS: &str = r#"
    id, user_id, nutritionist_id, title, goal, budget_per_meal, dietary_restrictions,
    plan_data, source, status, nutritionist_feedback, created_at, validated_at
"#;

/// Result of a conditional review update.
#[derive(Debug)]
pub enum ReviewOutcome {
    Updated(PlanRecord),
    AlreadyReviewed(PlanStatus),
    NotFound,
}

pub async fn insert_plan(db: &PgPool, plan: &PlanRecord) -> anyhow::Result<PlanRecord> {
    let sql = format!(
        r#"
        INSERT INTO diet_plans ({PLAN_COLUMNS})
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING {PLAN_COLUMNS}
        "#
    );
    let row = sqlx::query_as::<_, PlanRow>(&sql)
        .bind(plan.id)
        .bind(plan.user_id)
        .bind(plan.nutritionist_id)
        .bind(&plan.title)
        .bind(&plan.goal)
        .bind(plan.budget_per_meal)
        .bind(&plan.dietary_restrictions)
        .bind(&plan.plan_data)
        .bind(plan.source.as_str())
        .bind(plan.status.as_str())
        .bind(&plan.nutritionist_feedback)
        .bind(plan.created_at)
        .bind(plan.validated_at)
        .fetch_one(db)
        .await
        .context("insert diet plan")?;
    PlanRecord::try_from(row)
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<PlanRecord>> {
    let sql = format!("SELECT {PLAN_COLUMNS} FROM diet_plans WHERE id = $1");
    let row = sqlx::query_as::<_, PlanRow>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await
        .context("select diet plan")?;
    row.map(PlanRecord::try_from).transpose()
}

/// A user's plans, newest first.
pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<PlanRecord>> {
    let sql = format!(
        "SELECT {PLAN_COLUMNS} FROM diet_plans WHERE user_id = $1 ORDER BY created_at DESC"
    );
    let rows = sqlx::query_as::<_, PlanRow>(&sql)
        .bind(user_id)
        .fetch_all(db)
        .await
        .context("list plans by user")?;
    rows.into_iter().map(PlanRecord::try_from).collect()
}

/// Pending plans, newest first.
pub async fn list_pending(db: &PgPool, limit: Option<i64>) -> anyhow::Result<Vec<PlanRecord>> {
    let sql = format!(
        r#"
        SELECT {PLAN_COLUMNS} FROM diet_plans
         WHERE status = 'pending'
         ORDER BY created_at DESC
         LIMIT $1
        "#
    );
    // LIMIT NULL means no limit in Postgres
    let rows = sqlx::query_as::<_, PlanRow>(&sql)
        .bind(limit)
        .fetch_all(db)
        .await
        .context("list pending plans")?;
    rows.into_iter().map(PlanRecord::try_from).collect()
}

/// Applies a review only if the plan is still pending, so concurrent reviewers
/// cannot both succeed.
pub async fn update_status(
    db: &PgPool,
    id: Uuid,
    status: PlanStatus,
    feedback: Option<&str>,
    reviewer: Uuid,
    at: OffsetDateTime,
) -> anyhow::Result<ReviewOutcome> {
    let sql = format!(
        r#"
        UPDATE diet_plans
           SET status = $2, nutritionist_feedback = $3, nutritionist_id = $4, validated_at = $5
         WHERE id = $1 AND status = 'pending'
        RETURNING {PLAN_COLUMNS}
        "#
    );
    let updated = sqlx::query_as::<_, PlanRow>(&sql)
        .bind(id)
        .bind(status.as_str())
        .bind(feedback)
        .bind(reviewer)
        .bind(at)
        .fetch_optional(db)
        .await
        .context("update plan status")?;

    if let Some(row) = updated {
        return Ok(ReviewOutcome::Updated(PlanRecord::try_from(row)?));
    }

    // Nothing updated: either the plan does not exist or it left `pending`.
    Ok(match find_by_id(db, id).await? {
        Some(plan) => ReviewOutcome::AlreadyReviewed(plan.status),
        None => ReviewOutcome::NotFound,
    })
}

pub async fn reviewer_stats(db: &PgPool, reviewer: Uuid) -> anyhow::Result<ReviewerStats> {
    sqlx::query_as::<_, ReviewerStats>(
        r#"
        SELECT COUNT(*)                                      AS validated,
               COUNT(*) FILTER (WHERE status = 'approved')   AS approved,
               COUNT(*) FILTER (WHERE status = 'rejected')   AS rejected,
               COUNT(DISTINCT user_id)                       AS unique_patients
          FROM diet_plans
         WHERE nutritionist_id = $1
        "#,
    )
    .bind(reviewer)
    .fetch_one(db)
    .await
    .context("reviewer stats")
}

pub async fn counts(db: &PgPool) -> anyhow::Result<PlanCounts> {
    sqlx::query_as::<_, PlanCounts>(
        r#"
        SELECT COUNT(*)                                     AS total,
               COUNT(*) FILTER (WHERE status = 'pending')   AS pending
          FROM diet_plans
        "#,
    )
    .fetch_one(db)
    .await
    .context("plan counts")
}
