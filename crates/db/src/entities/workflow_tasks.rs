//! `SeaORM` Entity for workflow_tasks table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "workflow_tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub instance_id: i64,
    pub company_id: i64,
    pub document_type: String,
    pub document_id: i64,
    pub step_order: i32,
    pub assigned_to_user_id: i64,
    pub action: String,
    pub acted_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::document_workflow_instances::Entity",
        from = "Column::InstanceId",
        to = "super::document_workflow_instances::Column::Id",
        on_delete = "Cascade"
    )]
    Instance,
}

impl Related<super::document_workflow_instances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Instance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
