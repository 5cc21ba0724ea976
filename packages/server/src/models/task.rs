use serde::Serialize;

/// One row of the task list.
///
/// `score` and `submission_count` are present only when the caller is on a team.
#[derive(Serialize, utoipa::ToSchema)]
pub struct TaskAbstract {
    #[schema(example = "A")]
    pub name: String,
    #[schema(example = "Warm-up")]
    pub display_name: String,
    /// Sum of the subtask maxima.
    #[schema(example = 100)]
    pub max_score: i32,
    /// The caller's team score on this task.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 50)]
    pub score: Option<i32>,
    #[schema(example = 3)]
    pub submission_limit: i32,
    /// Submissions the caller's team has made on this task.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 1)]
    pub submission_count: Option<u64>,
}

/// Task header used by the standings.
#[derive(Serialize, utoipa::ToSchema)]
pub struct TaskSummary {
    #[schema(example = "A")]
    pub name: String,
    #[schema(example = "Warm-up")]
    pub display_name: String,
    #[schema(example = 100)]
    pub max_score: i32,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SubtaskDetail {
    #[schema(example = "A1")]
    pub name: String,
    #[schema(example = "Part one")]
    pub display_name: String,
    pub statement: String,
    #[schema(example = 100)]
    pub max_score: i32,
    /// Best score of the caller's team on this subtask.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 100)]
    pub score: Option<i32>,
}

/// Full task view with its subtask breakdown.
#[derive(Serialize, utoipa::ToSchema)]
pub struct TaskDetail {
    #[schema(example = "A")]
    pub name: String,
    #[schema(example = "Warm-up")]
    pub display_name: String,
    pub statement: String,
    #[schema(example = 100)]
    pub max_score: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i32>,
    #[schema(example = 3)]
    pub submission_limit: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_count: Option<u64>,
    pub subtasks: Vec<SubtaskDetail>,
}
