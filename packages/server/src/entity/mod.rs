pub mod answer;
pub mod subtask;
pub mod submission;
pub mod task;
pub mod team;
pub mod user;
