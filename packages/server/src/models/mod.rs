pub mod shared;
pub mod standings;
pub mod submission;
pub mod task;
