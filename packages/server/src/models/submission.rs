use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::services::submission::SubmitOutcome;

/// Request body for submitting an answer.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SubmitRequest {
    #[schema(example = "A")]
    pub task_name: String,
    #[schema(example = "42")]
    pub answer: String,
    /// Client-side submission time in unix seconds.
    #[schema(example = 1760000000)]
    pub timestamp: i64,
}

impl SubmitRequest {
    /// Check the body and return the submission time it carries.
    pub fn validate(&self) -> Result<DateTime<Utc>, AppError> {
        DateTime::from_timestamp(self.timestamp, 0)
            .ok_or_else(|| AppError::Validation("timestamp is out of range".into()))
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SubmitResponse {
    /// Whether the answer matched a subtask answer.
    pub is_scored: bool,
    #[schema(example = 100)]
    pub score: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "A1")]
    pub subtask_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtask_display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 100)]
    pub subtask_max_score: Option<i32>,
    /// Submissions left to the team on this task.
    #[schema(example = 2)]
    pub remaining_submissions: i32,
}

impl From<SubmitOutcome> for SubmitResponse {
    fn from(outcome: SubmitOutcome) -> Self {
        let is_scored = outcome.scoring.is_scored();
        let subtask = outcome.scoring.subtask;
        Self {
            is_scored,
            score: outcome.scoring.score,
            subtask_name: subtask.as_ref().map(|s| s.name.clone()),
            subtask_display_name: subtask.as_ref().map(|s| s.display_name.clone()),
            subtask_max_score: subtask.map(|s| s.max_score),
            remaining_submissions: outcome.remaining_submissions,
        }
    }
}

/// Query parameters for the submission history.
///
/// Empty values are treated as absent.
#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SubmissionListQuery {
    /// Only submissions to this task.
    #[param(example = "A")]
    pub task_name: Option<String>,
    /// Only submissions by this user.
    pub user_name: Option<String>,
    /// Only submissions by this team. Honoured for admins only.
    pub team_name: Option<String>,
    /// Substring the submitted answer must contain.
    pub filter: Option<String>,
    /// Only submissions that matched a subtask with this name.
    pub subtask_name: Option<String>,
    /// 1-based page number.
    #[param(example = 1)]
    pub page: Option<i64>,
}

/// One submission in the history.
///
/// Subtask fields are empty and zero for unmatched submissions.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SubmissionEntry {
    #[schema(example = "A")]
    pub task_name: String,
    pub task_display_name: String,
    #[schema(example = "A1")]
    pub subtask_name: String,
    pub subtask_display_name: String,
    #[schema(example = 100)]
    pub subtask_max_score: i32,
    #[schema(example = "alice")]
    pub user_name: String,
    pub user_display_name: String,
    /// Unix seconds.
    #[schema(example = 1760000000)]
    pub submitted_at: i64,
    #[schema(example = "42")]
    pub answer: String,
    #[schema(example = 100)]
    pub score: i32,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SubmissionListResponse {
    pub submissions: Vec<SubmissionEntry>,
    /// Matching submissions across all pages.
    #[schema(example = 25)]
    pub submission_count: u64,
    #[schema(example = 1)]
    pub page: u64,
    #[schema(example = 20)]
    pub per_page: u64,
}
