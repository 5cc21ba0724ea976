pub mod aggregate;
pub mod config;
pub mod pagination;
pub mod ranking;
pub mod scoring;

pub use aggregate::{ScoredAttempt, best_per_subtask, task_score};
pub use pagination::{PageError, PageRequest};
pub use ranking::{Ranked, assign_ranks};
pub use scoring::{AnswerKey, MatchedSubtask, ScoringOutcome, SubtaskAnswers, score_answer};
