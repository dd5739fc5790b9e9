use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::PlanRecord;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    Pending,
    Approved,
    Rejected,
}

impl PlanStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PlanStatus::Pending => "pending",
            PlanStatus::Approved => "approved",
            PlanStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PlanStatus::Pending),
            "approved" => Ok(PlanStatus::Approved),
            "rejected" => Ok(PlanStatus::Rejected),
            other => anyhow::bail!("unknown plan status: {other}"),
        }
    }
}

/// Decision a nutritionist takes on a pending plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Approve,
    Reject,
}

impl ReviewAction {
    pub fn resulting_status(self) -> PlanStatus {
        match self {
            ReviewAction::Approve => PlanStatus::Approved,
            ReviewAction::Reject => PlanStatus::Rejected,
        }
    }
}

impl FromStr for ReviewAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "approve" => Ok(ReviewAction::Approve),
            "reject" => Ok(ReviewAction::Reject),
            _ => Err(AppError::Validation(
                "action must be 'approve' or 'reject'".into(),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("plan was already {0}")]
    AlreadyReviewed(PlanStatus),
}

impl PlanRecord {
    /// Moves a pending plan to approved or rejected. Only valid once.
    pub fn review(
        &mut self,
        action: ReviewAction,
        reviewer: Uuid,
        feedback: Option<String>,
        at: OffsetDateTime,
    ) -> Result<(), ReviewError> {
        if self.status != PlanStatus::Pending {
            return Err(ReviewError::AlreadyReviewed(self.status));
        }
        self.status = action.resulting_status();
        self.nutritionist_id = Some(reviewer);
        self.nutritionist_feedback = feedback;
        self.validated_at = Some(at);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plans::document::PlanSource;
    use serde_json::json;

    fn pending() -> PlanRecord {
        PlanRecord::new_pending(
            Uuid::new_v4(),
            "Balanced Plan".into(),
            None,
            25.0,
            None,
            json!({"fallback": true}),
            PlanSource::Fallback,
        )
    }

    #[test]
    fn approve_records_reviewer_and_time() {
        let mut plan = pending();
        let reviewer = Uuid::new_v4();
        let at = OffsetDateTime::now_utc();

        plan.review(ReviewAction::Approve, reviewer, Some("ok".into()), at)
            .expect("first review succeeds");

        assert_eq!(plan.status, PlanStatus::Approved);
        assert_eq!(plan.nutritionist_id, Some(reviewer));
        assert_eq!(plan.nutritionist_feedback.as_deref(), Some("ok"));
        assert_eq!(plan.validated_at, Some(at));
    }

    #[test]
    fn second_review_is_rejected() {
        let mut plan = pending();
        let now = OffsetDateTime::now_utc();
        plan.review(ReviewAction::Reject, Uuid::new_v4(), None, now)
            .unwrap();

        let err = plan
            .review(ReviewAction::Approve, Uuid::new_v4(), None, now)
            .unwrap_err();
        assert_eq!(err, ReviewError::AlreadyReviewed(PlanStatus::Rejected));
        assert_eq!(plan.status, PlanStatus::Rejected);
    }

    #[test]
    fn actions_parse_case_insensitively() {
        assert_eq!("Approve".parse::<ReviewAction>().unwrap(), ReviewAction::Approve);
        assert_eq!(" reject ".parse::<ReviewAction>().unwrap(), ReviewAction::Reject);
        assert!(matches!(
            "maybe".parse::<ReviewAction>(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn status_strings() {
        for s in [PlanStatus::Pending, PlanStatus::Approved, PlanStatus::Rejected] {
            assert_eq!(s.to_string().parse::<PlanStatus>().unwrap(), s);
        }
    }
}
