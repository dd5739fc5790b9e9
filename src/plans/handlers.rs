use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{
        DashboardResponse, GeneratePlanResponse, MyPlansResponse, OwnerAnalysis,
        PendingPlansResponse, PlanDetailsResponse, ValidatePlanRequest,
    },
    repo::{self, ReviewOutcome},
    review::{ReviewAction, ReviewError},
    services::{approval_rate, can_view, generate_plan, review_plan},
};
use crate::{
    auth::{AuthUser, Reviewer},
    error::AppError,
    metabolism::MetabolicSnapshot,
    profiles::{self, services::load_profile},
    state::AppState,
};

const RECENT_PENDING_LIMIT: i64 = 5;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/plans/generate", post(generate))
        .route("/plans/mine", get(my_plans))
        .route("/plans/pending", get(pending_plans))
        .route("/plans/dashboard", get(dashboard))
        .route("/plans/:id", get(plan_details))
        .route("/plans/:id/validate", post(validate_plan))
}

#[instrument(skip(state))]
pub async fn generate(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<(StatusCode, Json<GeneratePlanResponse>), AppError> {
    let profile = load_profile(&state.db, user_id).await?;
    let assembler = state.assembler();
    let generated = generate_plan(&assembler, &profile).await?;
    let plan = repo::insert_plan(&state.db, &generated.record).await?;

    info!(user_id = %user_id, plan_id = %plan.id, "plan generated");
    Ok((
        StatusCode::CREATED,
        Json(GeneratePlanResponse {
            plan,
            metrics: generated.metrics,
            ai_configured: assembler.is_configured(),
        }),
    ))
}

#[instrument(skip(state))]
pub async fn my_plans(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<MyPlansResponse>, AppError> {
    let profile = load_profile(&state.db, user_id).await?;
    let plans = repo::list_by_user(&state.db, user_id).await?;
    Ok(Json(MyPlansResponse {
        plans,
        metrics: MetabolicSnapshot::of(&profile),
    }))
}

#[instrument(skip(state))]
pub async fn pending_plans(
    State(state): State<AppState>,
    Reviewer(user_id): Reviewer,
) -> Result<Json<PendingPlansResponse>, AppError> {
    let plans = repo::list_pending(&state.db, None).await?;
    let stats = repo::reviewer_stats(&state.db, user_id).await?;
    Ok(Json(PendingPlansResponse { plans, stats }))
}

#[instrument(skip(state))]
pub async fn dashboard(
    State(state): State<AppState>,
    Reviewer(user_id): Reviewer,
) -> Result<Json<DashboardResponse>, AppError> {
    let counts = repo::counts(&state.db).await?;
    let stats = repo::reviewer_stats(&state.db, user_id).await?;
    let recent_pending = repo::list_pending(&state.db, Some(RECENT_PENDING_LIMIT)).await?;

    Ok(Json(DashboardResponse {
        total_plans: counts.total,
        pending_plans: counts.pending,
        my_validations: stats.validated,
        my_approvals: stats.approved,
        my_rejections: stats.rejected,
        approval_rate: approval_rate(&stats),
        unique_patients: stats.unique_patients,
        recent_pending,
    }))
}

#[instrument(skip(state))]
pub async fn plan_details(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(plan_id): Path<Uuid>,
) -> Result<Json<PlanDetailsResponse>, AppError> {
    let viewer = load_profile(&state.db, user_id).await?;
    let plan = repo::find_by_id(&state.db, plan_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Plan not found".into()))?;

    if !can_view(&viewer, &plan) {
        warn!(user_id = %user_id, plan_id = %plan_id, "plan access denied");
        return Err(AppError::Forbidden("You cannot view this plan".into()));
    }

    let owner = if viewer.is_nutritionist() {
        profiles::repo::find_by_id(&state.db, plan.user_id)
            .await?
            .as_ref()
            .map(OwnerAnalysis::from)
    } else {
        None
    };

    Ok(Json(PlanDetailsResponse { plan, owner }))
}

#[instrument(skip(state, payload))]
pub async fn validate_plan(
    State(state): State<AppState>,
    Reviewer(user_id): Reviewer,
    Path(plan_id): Path<Uuid>,
    Json(payload): Json<ValidatePlanRequest>,
) -> Result<Json<PlanDetailsResponse>, AppError> {
    let action: ReviewAction = payload.action.parse()?;
    let feedback = payload
        .feedback
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty());

    let now = OffsetDateTime::now_utc();
    let current = repo::find_by_id(&state.db, plan_id).await?;
    let reviewed = review_plan(current, action, user_id, feedback, now).map_err(|e| {
        warn!(plan_id = %plan_id, error = %e, "plan review refused");
        e
    })?;

    // Only applies while the row is still pending; a concurrent reviewer
    // that got there first turns this into `AlreadyReviewed`.
    let outcome = repo::update_status(
        &state.db,
        reviewed.id,
        reviewed.status,
        reviewed.nutritionist_feedback.as_deref(),
        user_id,
        now,
    )
    .await?;

    match outcome {
        ReviewOutcome::Updated(plan) => {
            info!(
                plan_id = %plan.id,
                reviewer = %user_id,
                status = %plan.status,
                "plan reviewed"
            );
            Ok(Json(PlanDetailsResponse { plan, owner: None }))
        }
        ReviewOutcome::AlreadyReviewed(status) => {
            warn!(plan_id = %plan_id, status = %status, "plan already reviewed");
            Err(ReviewError::AlreadyReviewed(status).into())
        }
        ReviewOutcome::NotFound => Err(AppError::NotFound("Plan not found".into())),
    }
}
