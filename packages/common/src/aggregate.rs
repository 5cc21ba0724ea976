//! Best-per-subtask aggregation of a team's attempts on one task.

use std::collections::BTreeMap;

/// A stored submission reduced to the two columns the fold needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredAttempt {
    /// `None` for submissions that matched no answer.
    pub subtask_id: Option<i32>,
    pub score: i32,
}

impl ScoredAttempt {
    pub fn new(subtask_id: Option<i32>, score: i32) -> Self {
        Self { subtask_id, score }
    }
}

/// Highest score seen per subtask.
///
/// Unmatched attempts carry no subtask and are skipped.
pub fn best_per_subtask<I>(attempts: I) -> BTreeMap<i32, i32>
where
    I: IntoIterator<Item = ScoredAttempt>,
{
    attempts
        .into_iter()
        .fold(BTreeMap::new(), |mut best, attempt| {
            if let Some(subtask_id) = attempt.subtask_id {
                best.entry(subtask_id)
                    .and_modify(|score: &mut i32| *score = (*score).max(attempt.score))
                    .or_insert(attempt.score);
            }
            best
        })
}

/// Sum of the best score on every subtask the attempts touched.
pub fn task_score<I>(attempts: I) -> i32
where
    I: IntoIterator<Item = ScoredAttempt>,
{
    best_per_subtask(attempts).values().sum()
}
