use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One scoring attempt. Rows are append-only.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "submission")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub task_id: i32,
    #[sea_orm(belongs_to, from = "task_id", to = "id")]
    pub task: HasOne<super::task::Entity>,

    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    /// Client-supplied submission time.
    pub submitted_at: DateTimeUtc,
    pub answer: String,

    /// NULL when the answer matched nothing.
    pub subtask_id: Option<i32>,
    /// 0 when the answer matched nothing.
    pub score: i32,
}

impl ActiveModelBehavior for ActiveModel {}
