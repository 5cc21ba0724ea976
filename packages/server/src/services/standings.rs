//! The leaderboard read path.

use common::assign_ranks;
use sea_orm::DatabaseConnection;
use tracing::{debug, instrument};

use crate::cache::{AggregateCache, TeamTaskKey};
use crate::entity::user;
use crate::error::AppError;
use crate::models::standings::{Standings, TaskScoring, TeamStanding};
use crate::models::task::TaskSummary;
use crate::services::aggregate;
use crate::state::AppState;
use crate::store;

async fn member(
    cache: &AggregateCache,
    db: &DatabaseConnection,
    user_id: Option<i32>,
) -> Result<Option<user::Model>, AppError> {
    match user_id {
        Some(id) => Ok(Some(aggregate::user(cache, db, id).await?)),
        None => Ok(None),
    }
}

/// Score every team on every task and rank the result.
#[instrument(skip(state))]
pub async fn build_standings(state: &AppState) -> Result<Standings, AppError> {
    let db = &state.db;
    let cache = &state.cache;

    let tasks = store::list_tasks(db).await?;
    let mut tasks_data = Vec::with_capacity(tasks.len());
    for task in &tasks {
        tasks_data.push(TaskSummary {
            name: task.name.clone(),
            display_name: task.display_name.clone(),
            max_score: aggregate::task_max_score(cache, db, task.id).await?,
        });
    }

    let teams = store::list_teams(db).await?;
    let mut standings_data = Vec::with_capacity(teams.len());
    for team in &teams {
        let members = team.member_ids();
        let leader = aggregate::user(cache, db, team.leader_id).await?;
        let member1 = member(cache, db, team.member1_id).await?;
        let member2 = member(cache, db, team.member2_id).await?;

        let mut scoring_data = Vec::with_capacity(tasks.len());
        let mut total_score = 0i64;
        for task in &tasks {
            let key = TeamTaskKey::new(team.id, task.id);
            let has_submitted = aggregate::team_has_submitted(cache, db, key, &members).await?;
            let score = if has_submitted {
                aggregate::team_task_score(cache, db, key, &members).await?
            } else {
                0
            };
            total_score += i64::from(score);
            scoring_data.push(TaskScoring {
                task_name: task.name.clone(),
                has_submitted,
                score,
            });
        }

        standings_data.push(TeamStanding {
            rank: 0,
            team_name: team.name.clone(),
            team_display_name: team.display_name.clone(),
            leader_name: leader.name,
            leader_display_name: leader.display_name,
            member1_name: member1.as_ref().map(|u| u.name.clone()),
            member1_display_name: member1.map(|u| u.display_name),
            member2_name: member2.as_ref().map(|u| u.name.clone()),
            member2_display_name: member2.map(|u| u.display_name),
            scoring_data,
            total_score,
        });
    }

    assign_ranks(&mut standings_data);
    debug!(teams = standings_data.len(), "Standings built");

    Ok(Standings {
        tasks_data,
        standings_data,
    })
}
