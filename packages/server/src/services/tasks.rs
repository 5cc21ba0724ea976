//! Task list and task detail views, with the caller's team progress.

use common::best_per_subtask;
use tracing::instrument;

use crate::cache::TeamTaskKey;
use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::models::task::{SubtaskDetail, TaskAbstract, TaskDetail};
use crate::services::aggregate;
use crate::state::AppState;
use crate::store;

struct CallerTeam {
    id: i32,
    members: Vec<i32>,
}

/// Anonymous and teamless callers get no progress fields.
async fn caller_team(
    state: &AppState,
    caller: Option<&AuthUser>,
) -> Result<Option<CallerTeam>, AppError> {
    let Some(caller) = caller else {
        return Ok(None);
    };
    let team = store::find_team_by_member(&state.db, caller.user_id).await?;
    Ok(team.map(|team| CallerTeam {
        id: team.id,
        members: team.member_ids(),
    }))
}

#[instrument(skip_all)]
pub async fn list_task_views(
    state: &AppState,
    caller: Option<&AuthUser>,
) -> Result<Vec<TaskAbstract>, AppError> {
    let db = &state.db;
    let cache = &state.cache;
    let team = caller_team(state, caller).await?;

    let tasks = store::list_tasks(db).await?;
    let mut views = Vec::with_capacity(tasks.len());
    for task in tasks {
        let max_score = aggregate::task_max_score(cache, db, task.id).await?;
        let (score, submission_count) = match &team {
            Some(team) => {
                let key = TeamTaskKey::new(team.id, task.id);
                let score = aggregate::team_task_score(cache, db, key, &team.members).await?;
                let count = store::count_team_submissions(db, task.id, &team.members).await?;
                (Some(score), Some(count))
            }
            None => (None, None),
        };
        views.push(TaskAbstract {
            name: task.name,
            display_name: task.display_name,
            max_score,
            score,
            submission_limit: task.submission_limit,
            submission_count,
        });
    }
    Ok(views)
}

#[instrument(skip(state, caller))]
pub async fn task_view(
    state: &AppState,
    name: &str,
    caller: Option<&AuthUser>,
) -> Result<TaskDetail, AppError> {
    let db = &state.db;
    let cache = &state.cache;

    let task = store::find_task_by_name(db, name)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
    let team = caller_team(state, caller).await?;

    let (best, submission_count) = match &team {
        Some(team) => {
            let attempts = store::team_attempts(db, task.id, &team.members).await?;
            let count = store::count_team_submissions(db, task.id, &team.members).await?;
            (Some(best_per_subtask(attempts)), Some(count))
        }
        None => (None, None),
    };

    let subtasks = aggregate::subtasks(cache, db, task.id).await?;
    let mut details = Vec::with_capacity(subtasks.len());
    let mut max_score = 0;
    for subtask in subtasks.iter() {
        let subtask_max = aggregate::subtask_max_score(cache, db, subtask.id).await?;
        max_score += subtask_max;
        details.push(SubtaskDetail {
            name: subtask.name.clone(),
            display_name: subtask.display_name.clone(),
            statement: subtask.statement.clone(),
            max_score: subtask_max,
            score: best
                .as_ref()
                .map(|best| best.get(&subtask.id).copied().unwrap_or(0)),
        });
    }
    let score = best
        .is_some()
        .then(|| details.iter().filter_map(|d| d.score).sum());

    Ok(TaskDetail {
        name: task.name,
        display_name: task.display_name,
        statement: task.statement,
        max_score,
        score,
        submission_limit: task.submission_limit,
        submission_count,
        subtasks: details,
    })
}
