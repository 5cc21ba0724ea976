use common::Ranked;
use serde::Serialize;

use super::task::TaskSummary;

#[derive(Serialize, utoipa::ToSchema)]
pub struct TaskScoring {
    #[schema(example = "A")]
    pub task_name: String,
    /// Whether any team member has submitted to the task, scored or not.
    pub has_submitted: bool,
    #[schema(example = 100)]
    pub score: i32,
}

/// One leaderboard row.
#[derive(Serialize, utoipa::ToSchema)]
pub struct TeamStanding {
    /// 1-based, shared between teams with equal totals.
    #[schema(example = 1)]
    pub rank: u32,
    #[schema(example = "red")]
    pub team_name: String,
    #[schema(example = "Team Red")]
    pub team_display_name: String,
    pub leader_name: String,
    pub leader_display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member1_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member1_display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member2_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member2_display_name: Option<String>,
    /// Per-task results, in task name order.
    pub scoring_data: Vec<TaskScoring>,
    #[schema(example = 150)]
    pub total_score: i64,
}

impl Ranked for TeamStanding {
    fn total_score(&self) -> i64 {
        self.total_score
    }

    fn tie_break_name(&self) -> &str {
        &self.team_name
    }

    fn set_rank(&mut self, rank: u32) {
        self.rank = rank;
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct Standings {
    pub tasks_data: Vec<TaskSummary>,
    /// Teams ordered by rank, then by name.
    pub standings_data: Vec<TeamStanding>,
}
