use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use super::{
    assembler::PlanAssembler,
    context::PlanContext,
    repo_types::{PlanRecord, ReviewerStats},
    review::ReviewAction,
};
use crate::{
    error::AppError,
    metabolism::{round_to, MetabolicSnapshot},
    profiles::Profile,
};

/// A freshly assembled plan, not yet persisted.
#[derive(Debug)]
pub struct GeneratedPlan {
    pub record: PlanRecord,
    pub metrics: MetabolicSnapshot,
}

/// Only end users with weight, height, age and goal filled in may generate.
pub fn ensure_can_generate(profile: &Profile) -> Result<(), AppError> {
    if profile.is_nutritionist() {
        return Err(AppError::Forbidden(
            "Only end users can generate plans".into(),
        ));
    }
    let mut missing = Vec::new();
    if profile.weight_kg.map_or(true, |w| w <= 0.0) {
        missing.push("weight_kg");
    }
    if profile.height_cm.map_or(true, |h| h <= 0.0) {
        missing.push("height_cm");
    }
    if profile.age.map_or(true, |a| a <= 0) {
        missing.push("age");
    }
    if profile.goal.as_deref().map_or(true, |g| g.trim().is_empty()) {
        missing.push("goal");
    }
    if !missing.is_empty() {
        return Err(AppError::IncompleteProfile(missing));
    }
    Ok(())
}

pub async fn generate_plan(
    assembler: &PlanAssembler,
    profile: &Profile,
) -> Result<GeneratedPlan, AppError> {
    ensure_can_generate(profile)?;

    let ctx = PlanContext::from_profile(profile);
    let document = assembler.assemble(&ctx).await;
    let source = document.source();
    let plan_data = document
        .to_value()
        .map_err(|e| AppError::Internal(e.into()))?;

    let record = PlanRecord::new_pending(
        profile.id,
        ctx.goal_class().plan_type().to_string(),
        profile.goal.clone(),
        ctx.budget_per_meal,
        profile.dietary_restrictions.clone(),
        plan_data,
        source,
    );
    info!(user_id = %profile.id, plan_id = %record.id, source = source.as_str(), "plan assembled");

    Ok(GeneratedPlan {
        record,
        metrics: ctx.metrics,
    })
}

/// Applies a review to a loaded plan. The caller persists the result with a
/// conditional update so a concurrent review still loses.
pub fn review_plan(
    plan: Option<PlanRecord>,
    action: ReviewAction,
    reviewer: Uuid,
    feedback: Option<&str>,
    at: OffsetDateTime,
) -> Result<PlanRecord, AppError> {
    let mut plan = plan.ok_or_else(|| AppError::NotFound("Plan not found".into()))?;
    plan.review(action, reviewer, feedback.map(str::to_string), at)?;
    Ok(plan)
}

/// Owners see their own plans; nutritionists see every plan.
pub fn can_view(viewer: &Profile, plan: &PlanRecord) -> bool {
    viewer.is_nutritionist() || plan.user_id == viewer.id
}

/// Share of approvals among a reviewer's validations, in percent.
pub fn approval_rate(stats: &ReviewerStats) -> f64 {
    if stats.validated == 0 {
        return 0.0;
    }
    round_to(stats.approved as f64 / stats.validated as f64 * 100.0, 1)
}
