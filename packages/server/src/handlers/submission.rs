use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::request::{AppJson, AppQuery};
use crate::models::submission::*;
use crate::services::history::{self, SubmissionFilter};
use crate::services::submission::{self, SubmitCommand};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/submit",
    tag = "Submissions",
    operation_id = "submitAnswer",
    summary = "Submit an answer",
    description = "Scores the answer against the task's subtasks and records it for the caller's team. Each team may submit at most `submission_limit` times per task.",
    request_body = SubmitRequest,
    responses(
        (status = 201, description = "Submission recorded", body = SubmitResponse),
        (status = 400, description = "Invalid body (VALIDATION_ERROR), caller has no team (NO_TEAM), or limit reached (SUBMISSION_LIMIT_EXCEEDED)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Task not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, task = %payload.task_name))]
pub async fn submit(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<SubmitRequest>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    let submitted_at = payload.validate()?;

    let outcome = submission::submit(
        &state,
        SubmitCommand {
            user_id: auth_user.user_id,
            task_name: payload.task_name,
            answer: payload.answer,
            submitted_at,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(SubmitResponse::from(outcome))))
}

#[utoipa::path(
    get,
    path = "/submissions",
    tag = "Submissions",
    operation_id = "listSubmissions",
    summary = "List submission history",
    description = "Returns submissions newest first, 20 per page. Contestants see their own team's submissions only. Admins see every team and may filter by `team_name`.",
    params(SubmissionListQuery),
    responses(
        (status = 200, description = "One page of submissions", body = SubmissionListResponse),
        (status = 400, description = "Bad query (VALIDATION_ERROR) or caller has no team (NO_TEAM)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Unknown task, user or team (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(user_id = auth_user.user_id))]
pub async fn list_submissions(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<SubmissionListQuery>,
) -> Result<Json<SubmissionListResponse>, AppError> {
    let filter = SubmissionFilter::from_query(query, state.config.contest.submissions_per_page)?;
    let page = history::list_submissions(&state, &auth_user, filter).await?;
    Ok(Json(page))
}
