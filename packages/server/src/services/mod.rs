pub mod aggregate;
pub mod history;
pub mod standings;
pub mod submission;
pub mod tasks;
