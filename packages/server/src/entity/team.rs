use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "team")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,
    pub display_name: String,

    pub leader_id: i32,
    pub member1_id: Option<i32>,
    pub member2_id: Option<i32>,
}

impl Model {
    /// Leader followed by whichever member slots are filled.
    pub fn member_ids(&self) -> Vec<i32> {
        std::iter::once(self.leader_id)
            .chain(self.member1_id)
            .chain(self.member2_id)
            .collect()
    }
}

impl ActiveModelBehavior for ActiveModel {}
