use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "task")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,
    pub display_name: String,
    pub statement: String, // in Markdown
    /// Maximum number of submissions per team, shared by all members.
    pub submission_limit: i32,

    #[sea_orm(has_many)]
    pub subtasks: HasMany<super::subtask::Entity>,

    #[sea_orm(has_many)]
    pub submissions: HasMany<super::submission::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
