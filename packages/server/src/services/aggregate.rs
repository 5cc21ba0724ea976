//! Cache-assisted reads shared by the write path and every read view.
//!
//! Each helper consults the [`AggregateCache`] first and falls back to the
//! store on a miss, repopulating the cache with what it loaded.

use std::sync::Arc;

use common::scoring::max_answer_score;
use common::{AnswerKey, SubtaskAnswers, task_score};
use sea_orm::{ConnectionTrait, DbErr};

use crate::cache::{AggregateCache, TeamTaskKey};
use crate::entity::{subtask, user};
use crate::error::AppError;
use crate::store;

pub async fn subtasks<C: ConnectionTrait>(
    cache: &AggregateCache,
    db: &C,
    task_id: i32,
) -> Result<Arc<Vec<subtask::Model>>, DbErr> {
    cache
        .subtasks
        .get_or_try_load(task_id, || async move {
            store::list_subtasks(db, task_id).await.map(Arc::new)
        })
        .await
}

pub async fn subtask_max_score<C: ConnectionTrait>(
    cache: &AggregateCache,
    db: &C,
    subtask_id: i32,
) -> Result<i32, DbErr> {
    cache
        .subtask_max_score
        .get_or_try_load(subtask_id, || async move {
            let answers = store::list_answers(db, subtask_id).await?;
            Ok::<_, DbErr>(max_answer_score(answers.iter().map(|a| a.score)))
        })
        .await
}

/// Sum of the maximum scores of the task's subtasks.
pub async fn task_max_score<C: ConnectionTrait>(
    cache: &AggregateCache,
    db: &C,
    task_id: i32,
) -> Result<i32, DbErr> {
    let mut total = 0;
    for subtask in subtasks(cache, db, task_id).await?.iter() {
        total += subtask_max_score(cache, db, subtask.id).await?;
    }
    Ok(total)
}

/// Users referenced by teams and submissions must exist.
pub async fn user<C: ConnectionTrait>(
    cache: &AggregateCache,
    db: &C,
    user_id: i32,
) -> Result<user::Model, AppError> {
    cache
        .users
        .get_or_try_load(user_id, || async move {
            match store::find_user(db, user_id).await {
                Ok(Some(user)) => Ok(user),
                Ok(None) => Err(AppError::Internal(format!(
                    "User {user_id} does not exist"
                ))),
                Err(err) => Err(AppError::from(err)),
            }
        })
        .await
}

pub async fn team_has_submitted<C: ConnectionTrait>(
    cache: &AggregateCache,
    db: &C,
    key: TeamTaskKey,
    member_ids: &[i32],
) -> Result<bool, DbErr> {
    cache
        .team_task_submitted
        .get_or_try_load(key, || async move {
            store::team_has_submitted(db, key.task_id, member_ids).await
        })
        .await
}

/// Best-per-subtask score of the team on the task.
pub async fn team_task_score<C: ConnectionTrait>(
    cache: &AggregateCache,
    db: &C,
    key: TeamTaskKey,
    member_ids: &[i32],
) -> Result<i32, DbErr> {
    cache
        .team_task_score
        .get_or_try_load(key, || async move {
            let attempts = store::team_attempts(db, key.task_id, member_ids).await?;
            Ok::<_, DbErr>(task_score(attempts))
        })
        .await
}

/// The task's subtasks with their full answer lists.
///
/// Answers are always read from `db` so a caller inside a transaction sees
/// the answer set of that transaction.
pub async fn subtask_answers<C: ConnectionTrait>(
    cache: &AggregateCache,
    db: &C,
    task_id: i32,
) -> Result<Vec<SubtaskAnswers>, DbErr> {
    let subtasks = subtasks(cache, db, task_id).await?;
    let mut out = Vec::with_capacity(subtasks.len());
    for subtask in subtasks.iter() {
        let answers = store::list_answers(db, subtask.id).await?;
        out.push(SubtaskAnswers {
            subtask_id: subtask.id,
            name: subtask.name.clone(),
            display_name: subtask.display_name.clone(),
            answers: answers
                .into_iter()
                .map(|a| AnswerKey::new(a.answer, a.score))
                .collect(),
        });
    }
    Ok(out)
}
