//! `SeaORM` Entity for workflow_steps table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "workflow_steps")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub workflow_id: i64,
    pub step_order: i32,
    pub name: String,
    pub approver_user_id: Option<i64>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::workflow_definitions::Entity",
        from = "Column::WorkflowId",
        to = "super::workflow_definitions::Column::Id",
        on_delete = "Cascade"
    )]
    WorkflowDefinitions,
}

impl Related<super::workflow_definitions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkflowDefinitions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
