//! Paginated, filterable submission history.

use std::collections::HashMap;

use common::PageRequest;
use sea_orm::sea_query::LikeExpr;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{submission, task, team};
use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::models::shared::{escape_like, non_empty};
use crate::models::submission::{SubmissionEntry, SubmissionListQuery, SubmissionListResponse};
use crate::services::aggregate;
use crate::state::AppState;
use crate::store;

/// Every filter the history understands. Absent fields do not filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionFilter {
    pub task_name: Option<String>,
    pub user_name: Option<String>,
    /// Honoured for admins only; everyone else is scoped to their own team.
    pub team_name: Option<String>,
    /// Substring of the submitted answer.
    pub text: Option<String>,
    pub subtask_name: Option<String>,
    pub page: PageRequest,
}

impl SubmissionFilter {
    pub fn from_query(query: SubmissionListQuery, per_page: u64) -> Result<Self, AppError> {
        Ok(Self {
            task_name: non_empty(query.task_name),
            user_name: non_empty(query.user_name),
            team_name: non_empty(query.team_name),
            text: non_empty(query.filter),
            subtask_name: non_empty(query.subtask_name),
            page: PageRequest::new(query.page, per_page)?,
        })
    }
}

fn empty_page(page: PageRequest) -> SubmissionListResponse {
    SubmissionListResponse {
        submissions: Vec::new(),
        submission_count: 0,
        page: page.page(),
        per_page: page.per_page(),
    }
}

/// The team whose submissions the caller may see, `None` meaning all teams.
async fn visible_team(
    state: &AppState,
    caller: &AuthUser,
    team_name: Option<&str>,
) -> Result<Option<team::Model>, AppError> {
    if !caller.is_admin(&state.config.contest) {
        let team = store::find_team_by_member(&state.db, caller.user_id)
            .await?
            .ok_or(AppError::NoTeam)?;
        return Ok(Some(team));
    }
    match team_name {
        Some(name) => store::find_team_by_name(&state.db, name)
            .await?
            .map(Some)
            .ok_or_else(|| AppError::NotFound("Team not found".into())),
        None => Ok(None),
    }
}

#[instrument(skip(state, caller), fields(user_id = caller.user_id))]
pub async fn list_submissions(
    state: &AppState,
    caller: &AuthUser,
    filter: SubmissionFilter,
) -> Result<SubmissionListResponse, AppError> {
    let db = &state.db;
    let page = filter.page;

    let mut select = submission::Entity::find();

    if let Some(team) = visible_team(state, caller, filter.team_name.as_deref()).await? {
        select = select.filter(submission::Column::UserId.is_in(team.member_ids()));
    }

    let task = match &filter.task_name {
        Some(name) => Some(
            store::find_task_by_name(db, name)
                .await?
                .ok_or_else(|| AppError::NotFound("Task not found".into()))?,
        ),
        None => None,
    };
    if let Some(task) = &task {
        select = select.filter(submission::Column::TaskId.eq(task.id));
    }

    if let Some(name) = &filter.user_name {
        let user = store::find_user_by_name(db, name)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        select = select.filter(submission::Column::UserId.eq(user.id));
    }

    if let Some(text) = &filter.text {
        let pattern = format!("%{}%", escape_like(text));
        select =
            select.filter(submission::Column::Answer.like(LikeExpr::new(pattern).escape('\\')));
    }

    if let Some(name) = &filter.subtask_name {
        let ids = store::subtask_ids_named(db, name, task.as_ref().map(|t| t.id)).await?;
        if ids.is_empty() {
            return Ok(empty_page(page));
        }
        select = select.filter(submission::Column::SubtaskId.is_in(ids));
    }

    let submission_count = select.clone().count(db).await?;
    if page.offset() >= submission_count {
        return Ok(SubmissionListResponse {
            submission_count,
            ..empty_page(page)
        });
    }

    let rows = select
        .order_by_desc(submission::Column::SubmittedAt)
        .order_by_desc(submission::Column::Id)
        .offset(page.offset())
        .limit(page.per_page())
        .all(db)
        .await?;

    let tasks: HashMap<i32, task::Model> = if rows.is_empty() {
        HashMap::new()
    } else {
        store::list_tasks(db)
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect()
    };

    let mut submissions = Vec::with_capacity(rows.len());
    for row in rows {
        submissions.push(describe(state, &tasks, row).await?);
    }

    Ok(SubmissionListResponse {
        submissions,
        submission_count,
        page: page.page(),
        per_page: page.per_page(),
    })
}

async fn describe(
    state: &AppState,
    tasks: &HashMap<i32, task::Model>,
    row: submission::Model,
) -> Result<SubmissionEntry, AppError> {
    let db = &state.db;
    let cache = &state.cache;

    let task = tasks
        .get(&row.task_id)
        .ok_or_else(|| AppError::Internal(format!("Task {} does not exist", row.task_id)))?;

    let (subtask_name, subtask_display_name, subtask_max_score) = match row.subtask_id {
        Some(subtask_id) => {
            let subtasks = aggregate::subtasks(cache, db, row.task_id).await?;
            let subtask = subtasks
                .iter()
                .find(|s| s.id == subtask_id)
                .ok_or_else(|| {
                    AppError::Internal(format!("Subtask {subtask_id} does not exist"))
                })?;
            (
                subtask.name.clone(),
                subtask.display_name.clone(),
                aggregate::subtask_max_score(cache, db, subtask_id).await?,
            )
        }
        None => (String::new(), String::new(), 0),
    };

    let user = aggregate::user(cache, db, row.user_id).await?;

    Ok(SubmissionEntry {
        task_name: task.name.clone(),
        task_display_name: task.display_name.clone(),
        subtask_name,
        subtask_display_name,
        subtask_max_score,
        user_name: user.name,
        user_display_name: user.display_name,
        submitted_at: row.submitted_at.timestamp(),
        answer: row.answer,
        score: row.score,
    })
}
