use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One accepted answer string of a subtask.
///
/// A subtask may have several answers worth different scores; its maximum
/// score is the best of them.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "answer")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Denormalized from the subtask.
    pub task_id: i32,

    pub subtask_id: i32,
    #[sea_orm(belongs_to, from = "subtask_id", to = "id")]
    pub subtask: HasOne<super::subtask::Entity>,

    pub answer: String,
    pub score: i32,
}

impl ActiveModelBehavior for ActiveModel {}
