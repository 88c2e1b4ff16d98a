//! Assignment entity: a unit of work handed to a user.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    #[sea_orm(column_name = "type")]
    pub assignment_type: Option<String>,
    pub assigned_to: Option<i32>,
    pub assigned_by: Option<i32>,
    pub created_by: Option<i32>,
    pub due_date: Option<DateTimeUtc>,
    pub status: String,
    pub priority: String,
    pub project_id: Option<i32>,
    pub test_case_id: Option<i32>,
    pub bug_id: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
