//! The write path: limit check, scoring, insert, cache update.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::{ScoringOutcome, score_answer};
use dashmap::DashMap;
use sea_orm::TransactionTrait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{Instrument, info, instrument, warn};

use crate::cache::TeamTaskKey;
use crate::error::AppError;
use crate::services::aggregate;
use crate::state::AppState;
use crate::store::{self, NewSubmission};

/// Serializes submissions of the same team to the same task.
///
/// The limit check and the insert that follows it must not interleave with
/// another submission for the same pair. Different pairs never contend.
#[derive(Default)]
pub struct SubmissionGate {
    locks: DashMap<TeamTaskKey, Arc<Mutex<()>>>,
}

impl SubmissionGate {
    pub async fn acquire(&self, key: TeamTaskKey) -> OwnedMutexGuard<()> {
        let lock = Arc::clone(&self.locks.entry(key).or_default());
        lock.lock_owned().await
    }
}

pub struct SubmitCommand {
    pub user_id: i32,
    pub task_name: String,
    pub answer: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub scoring: ScoringOutcome,
    /// Submissions the team has left on the task after this one.
    pub remaining_submissions: i32,
}

#[instrument(skip(state, command), fields(user_id = command.user_id, task = %command.task_name))]
pub async fn submit(state: &AppState, command: SubmitCommand) -> Result<SubmitOutcome, AppError> {
    // Detached so a dropped request cannot land between commit and cache update.
    let state = state.clone();
    tokio::spawn(async move { record(&state, command).await }.in_current_span())
        .await
        .map_err(|e| AppError::Internal(format!("Submission task failed: {e}")))?
}

async fn record(state: &AppState, command: SubmitCommand) -> Result<SubmitOutcome, AppError> {
    // Team and task rows do not change while the contest runs, and the gate
    // key needs their ids, so they are resolved outside the transaction.
    let team = store::find_team_by_member(&state.db, command.user_id)
        .await?
        .ok_or(AppError::NoTeam)?;
    let task = store::find_task_by_name(&state.db, &command.task_name)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
    let key = TeamTaskKey::new(team.id, task.id);

    // Held until the cache reflects the committed row.
    let _guard = state.gate.acquire(key).await;

    let txn = state.db.begin().await?;

    let members = team.member_ids();
    let prior = store::count_team_submissions(&txn, task.id, &members).await?;
    let prior = i32::try_from(prior).unwrap_or(i32::MAX);
    if prior >= task.submission_limit {
        warn!(
            team_id = team.id,
            prior,
            limit = task.submission_limit,
            "Submission limit reached"
        );
        return Err(AppError::LimitExceeded);
    }

    let subtasks = aggregate::subtask_answers(&state.cache, &txn, task.id).await?;
    let scoring = score_answer(&subtasks, &command.answer);

    store::insert_submission(
        &txn,
        NewSubmission {
            task_id: task.id,
            user_id: command.user_id,
            submitted_at: command.submitted_at,
            answer: &command.answer,
            subtask_id: scoring.subtask_id(),
            score: scoring.score,
        },
    )
    .await?;
    txn.commit().await?;

    state.cache.record_submission(key, scoring.is_scored());

    info!(
        team_id = team.id,
        task_id = task.id,
        scored = scoring.is_scored(),
        score = scoring.score,
        "Submission recorded"
    );

    Ok(SubmitOutcome {
        remaining_submissions: task.submission_limit - prior - 1,
        scoring,
    })
}
