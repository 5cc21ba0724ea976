use utoipa_axum::{router::OpenApiRouter, routes};

use crate::handlers::admin::*;
use crate::handlers::standings::*;
use crate::handlers::submission::*;
use crate::handlers::tasks::*;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(task_routes())
        .merge(submission_routes())
        .routes(routes!(get_standings))
        .routes(routes!(clear_cache))
}

fn task_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_tasks))
        .routes(routes!(get_task))
}

fn submission_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(submit))
        .routes(routes!(list_submissions))
}
