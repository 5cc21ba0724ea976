pub mod admin;
pub mod standings;
pub mod submission;
pub mod tasks;
