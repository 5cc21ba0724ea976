//! Matching a submitted string against a task's answer set.
//!
//! Everything here is a pure function of the answers handed in, so the
//! server can run it inside its write transaction or anywhere else.

use tracing::warn;

/// One accepted answer string and the points it is worth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerKey {
    pub answer: String,
    pub score: i32,
}

impl AnswerKey {
    pub fn new(answer: impl Into<String>, score: i32) -> Self {
        Self {
            answer: answer.into(),
            score,
        }
    }
}

/// A subtask together with every answer that scores it.
#[derive(Debug, Clone)]
pub struct SubtaskAnswers {
    pub subtask_id: i32,
    pub name: String,
    pub display_name: String,
    pub answers: Vec<AnswerKey>,
}

impl SubtaskAnswers {
    /// Best score obtainable on this subtask, 0 when it has no answers.
    pub fn max_score(&self) -> i32 {
        max_answer_score(self.answers.iter().map(|a| a.score))
    }
}

/// `max(scores)` with 0 as both the floor and the empty value.
pub fn max_answer_score(scores: impl IntoIterator<Item = i32>) -> i32 {
    scores.into_iter().fold(0, i32::max)
}

/// The subtask a submission landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedSubtask {
    pub subtask_id: i32,
    pub name: String,
    pub display_name: String,
    pub max_score: i32,
}

/// Result of scoring one submitted string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoringOutcome {
    /// Points awarded, 0 when nothing matched.
    pub score: i32,
    /// `None` when the string matched no answer.
    pub subtask: Option<MatchedSubtask>,
}

impl ScoringOutcome {
    pub fn is_scored(&self) -> bool {
        self.subtask.is_some()
    }

    pub fn subtask_id(&self) -> Option<i32> {
        self.subtask.as_ref().map(|s| s.subtask_id)
    }
}

/// Score `submitted` against every answer of every subtask.
///
/// Matching is exact and case-sensitive. Answer strings are expected to be
/// unique within a task; when they are not, the first match in the order the
/// subtasks and answers are given wins and the ambiguity is logged.
pub fn score_answer(subtasks: &[SubtaskAnswers], submitted: &str) -> ScoringOutcome {
    let mut outcome = ScoringOutcome::default();
    let mut matches = 0usize;

    for subtask in subtasks {
        for answer in subtask.answers.iter().filter(|a| a.answer == submitted) {
            matches += 1;
            if outcome.subtask.is_none() {
                outcome.score = answer.score;
                outcome.subtask = Some(MatchedSubtask {
                    subtask_id: subtask.subtask_id,
                    name: subtask.name.clone(),
                    display_name: subtask.display_name.clone(),
                    max_score: subtask.max_score(),
                });
            }
        }
    }

    if matches > 1 {
        warn!(
            matches,
            subtask_id = outcome.subtask_id(),
            "Submitted answer matches more than one answer key, using the first"
        );
    }

    outcome
}
