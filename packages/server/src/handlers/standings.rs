use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::models::standings::Standings;
use crate::services::standings::build_standings;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/standings",
    tag = "Standings",
    operation_id = "getStandings",
    summary = "Get the leaderboard",
    description = "Returns every task's maximum score and every team's per-task scores, ranked by total score. Teams with equal totals share a rank and are listed by name.",
    responses(
        (status = 200, description = "Ranked standings", body = Standings),
        (status = 500, description = "Internal error (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_standings(State(state): State<AppState>) -> Result<Json<Standings>, AppError> {
    Ok(Json(build_standings(&state).await?))
}
