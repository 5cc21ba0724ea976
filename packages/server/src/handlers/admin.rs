use axum::{extract::State, http::StatusCode};
use tracing::{info, instrument};

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/admin/cache/clear",
    tag = "Admin",
    operation_id = "clearCache",
    summary = "Clear the aggregate cache",
    description = "Drops every cached score, subtask list and user record. Subsequent reads repopulate from the database.",
    responses(
        (status = 204, description = "Cache cleared"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn clear_cache(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    auth_user.require_admin(&state.config.contest)?;
    state.cache.clear();
    info!("Aggregate cache cleared");
    Ok(StatusCode::NO_CONTENT)
}
