//! Typed queries over the contest tables.
//!
//! Every function is generic over [`ConnectionTrait`] so the same query runs
//! on the pool or inside a transaction.

use chrono::{DateTime, Utc};
use common::ScoredAttempt;
use sea_orm::*;

use crate::entity::{answer, submission, subtask, task, team, user};

pub async fn list_tasks<C: ConnectionTrait>(db: &C) -> Result<Vec<task::Model>, DbErr> {
    task::Entity::find()
        .order_by_asc(task::Column::Name)
        .all(db)
        .await
}

pub async fn find_task_by_name<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> Result<Option<task::Model>, DbErr> {
    task::Entity::find()
        .filter(task::Column::Name.eq(name))
        .one(db)
        .await
}

pub async fn list_subtasks<C: ConnectionTrait>(
    db: &C,
    task_id: i32,
) -> Result<Vec<subtask::Model>, DbErr> {
    subtask::Entity::find()
        .filter(subtask::Column::TaskId.eq(task_id))
        .order_by_asc(subtask::Column::Id)
        .all(db)
        .await
}

/// Ids of subtasks called `name`, optionally restricted to one task.
pub async fn subtask_ids_named<C: ConnectionTrait>(
    db: &C,
    name: &str,
    task_id: Option<i32>,
) -> Result<Vec<i32>, DbErr> {
    let mut select = subtask::Entity::find().filter(subtask::Column::Name.eq(name));
    if let Some(task_id) = task_id {
        select = select.filter(subtask::Column::TaskId.eq(task_id));
    }
    select
        .select_only()
        .column(subtask::Column::Id)
        .into_tuple()
        .all(db)
        .await
}

pub async fn list_answers<C: ConnectionTrait>(
    db: &C,
    subtask_id: i32,
) -> Result<Vec<answer::Model>, DbErr> {
    answer::Entity::find()
        .filter(answer::Column::SubtaskId.eq(subtask_id))
        .order_by_asc(answer::Column::Id)
        .all(db)
        .await
}

pub async fn list_teams<C: ConnectionTrait>(db: &C) -> Result<Vec<team::Model>, DbErr> {
    team::Entity::find()
        .order_by_asc(team::Column::Name)
        .all(db)
        .await
}

pub async fn find_team_by_name<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> Result<Option<team::Model>, DbErr> {
    team::Entity::find()
        .filter(team::Column::Name.eq(name))
        .one(db)
        .await
}

/// The team the user leads or belongs to.
pub async fn find_team_by_member<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Option<team::Model>, DbErr> {
    team::Entity::find()
        .filter(
            Condition::any()
                .add(team::Column::LeaderId.eq(user_id))
                .add(team::Column::Member1Id.eq(user_id))
                .add(team::Column::Member2Id.eq(user_id)),
        )
        .one(db)
        .await
}

pub async fn find_user<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<user::Model>, DbErr> {
    user::Entity::find_by_id(id).one(db).await
}

pub async fn find_user_by_name<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> Result<Option<user::Model>, DbErr> {
    user::Entity::find()
        .filter(user::Column::Name.eq(name))
        .one(db)
        .await
}

fn team_task_submissions(task_id: i32, member_ids: &[i32]) -> Select<submission::Entity> {
    submission::Entity::find()
        .filter(submission::Column::TaskId.eq(task_id))
        .filter(submission::Column::UserId.is_in(member_ids.iter().copied()))
}

pub async fn count_team_submissions<C: ConnectionTrait>(
    db: &C,
    task_id: i32,
    member_ids: &[i32],
) -> Result<u64, DbErr> {
    team_task_submissions(task_id, member_ids).count(db).await
}

pub async fn team_has_submitted<C: ConnectionTrait>(
    db: &C,
    task_id: i32,
    member_ids: &[i32],
) -> Result<bool, DbErr> {
    let first = team_task_submissions(task_id, member_ids)
        .select_only()
        .column(submission::Column::Id)
        .into_tuple::<i32>()
        .one(db)
        .await?;
    Ok(first.is_some())
}

/// Every (subtask, score) pair the team recorded on the task.
pub async fn team_attempts<C: ConnectionTrait>(
    db: &C,
    task_id: i32,
    member_ids: &[i32],
) -> Result<Vec<ScoredAttempt>, DbErr> {
    let rows: Vec<(Option<i32>, i32)> = team_task_submissions(task_id, member_ids)
        .select_only()
        .column(submission::Column::SubtaskId)
        .column(submission::Column::Score)
        .into_tuple()
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .map(|(subtask_id, score)| ScoredAttempt::new(subtask_id, score))
        .collect())
}

pub struct NewSubmission<'a> {
    pub task_id: i32,
    pub user_id: i32,
    pub submitted_at: DateTime<Utc>,
    pub answer: &'a str,
    pub subtask_id: Option<i32>,
    pub score: i32,
}

pub async fn insert_submission<C: ConnectionTrait>(
    db: &C,
    new: NewSubmission<'_>,
) -> Result<submission::Model, DbErr> {
    submission::ActiveModel {
        task_id: Set(new.task_id),
        user_id: Set(new.user_id),
        submitted_at: Set(new.submitted_at),
        answer: Set(new.answer.to_owned()),
        subtask_id: Set(new.subtask_id),
        score: Set(new.score),
        ..Default::default()
    }
    .insert(db)
    .await
}
