//! `SeaORM` Entity for document_workflow_instances table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "document_workflow_instances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub company_id: i64,
    pub workflow_id: i64,
    pub document_type: String,
    pub document_id: i64,
    pub current_step_order: i32,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub amount: Option<Decimal>,
    pub status: String,
    pub assigned_to_user_id: i64,
    pub submitted_by: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::workflow_tasks::Entity")]
    WorkflowTasks,
    #[sea_orm(has_many = "super::workflow_logs::Entity")]
    WorkflowLogs,
}

impl Related<super::workflow_tasks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkflowTasks.def()
    }
}

impl Related<super::workflow_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkflowLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
